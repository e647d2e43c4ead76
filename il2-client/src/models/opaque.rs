use serde::{Deserialize, Serialize};

/// Opaque record: application bytes the node stores without interpreting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub application_id: u64,
    #[serde(default)]
    pub payload_type_id: u64,
    #[serde(default)]
    pub payload_length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Raw payload, base64 in JSON listings
    #[serde(default, skip_serializing_if = "Option::is_none", with = "payload_base64")]
    pub payload: Option<Vec<u8>>,
}

/// Opaque record to append to a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOpaqueRecord {
    pub application_id: u64,
    pub payload_type_id: u64,
    pub payload: Vec<u8>,
    /// Refuse the append unless the chain's last serial equals this value
    pub last_changed_serial: Option<u64>,
}

impl NewOpaqueRecord {
    pub fn new(application_id: u64, payload_type_id: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            application_id,
            payload_type_id,
            payload: payload.into(),
            last_changed_serial: None,
        }
    }

    pub fn with_last_changed_serial(mut self, serial: u64) -> Self {
        self.last_changed_serial = Some(serial);
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("appId", self.application_id.to_string()),
            ("payloadTypeId", self.payload_type_id.to_string()),
        ];
        if let Some(serial) = self.last_changed_serial {
            query.push(("lastChangedRecordSerial", serial.to_string()));
        }
        query
    }
}

/// Filter for opaque record queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaqueQuery {
    pub application_id: u64,
    /// Empty matches every payload type
    pub payload_type_ids: Vec<u64>,
    /// How many records to return, all when unset or zero
    pub how_many: Option<u64>,
}

impl OpaqueQuery {
    pub fn new(application_id: u64) -> Self {
        Self {
            application_id,
            ..Default::default()
        }
    }

    pub fn with_payload_types(mut self, payload_type_ids: Vec<u64>) -> Self {
        self.payload_type_ids = payload_type_ids;
        self
    }

    pub fn with_how_many(mut self, how_many: u64) -> Self {
        self.how_many = Some(how_many);
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("appId", self.application_id.to_string())];
        query.extend(
            self.payload_type_ids
                .iter()
                .map(|id| ("payloadTypeIds", id.to_string())),
        );
        if let Some(how_many) = self.how_many {
            query.push(("howMany", how_many.to_string()));
        }
        query
    }
}

mod payload_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
