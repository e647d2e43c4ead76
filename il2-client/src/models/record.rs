use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use il2_keys::{HashAlgorithm, RecordType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields common to every record returned by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInfo {
    #[serde(default)]
    pub application_id: u64,
    pub chain_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub payload_tag_id: u64,
    /// Universal reference, `network:chainId@serial`
    #[serde(default)]
    pub reference: String,
    /// Zero for the root record
    #[serde(default)]
    pub serial: u64,
    #[serde(rename = "type", default = "default_record_type")]
    pub record_type: RecordType,
    #[serde(default)]
    pub version: u32,
}

fn default_record_type() -> RecordType {
    RecordType::Root
}

/// Record with its raw payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(flatten)]
    pub info: RecordInfo,
    /// Base64 payload, absent when the payload was omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<String>,
}

impl Record {
    pub fn payload(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.payload_bytes.as_deref().map(|b| STANDARD.decode(b))
    }
}

/// Raw record to append to a chain.
///
/// The payload must already be in the application's tagged format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub application_id: u64,
    /// Base64 payload
    pub payload_bytes: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl NewRecord {
    pub fn new(application_id: u64, payload: &[u8]) -> Self {
        Self {
            application_id,
            payload_bytes: STANDARD.encode(payload),
            record_type: RecordType::Data,
        }
    }
}

/// Interlocking record pointing at another chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterlockingRecord {
    #[serde(flatten)]
    pub info: RecordInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interlocked_chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interlocked_record_hash: Option<String>,
    #[serde(default)]
    pub interlocked_record_offset: u64,
    #[serde(default)]
    pub interlocked_record_serial: u64,
}

/// Parameters to force an interlock on a target chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceInterlock {
    pub target_chain: String,
    pub hash_algorithm: HashAlgorithm,
    /// Minimum serial of the target's last record whose hash is pulled
    #[serde(default)]
    pub min_serial: u64,
}

impl ForceInterlock {
    pub fn new(target_chain: impl Into<String>) -> Self {
        Self {
            target_chain: target_chain.into(),
            hash_algorithm: HashAlgorithm::Copy,
            min_serial: 0,
        }
    }
}

/// Serial range and payload options for record listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Defaults to the first record of the chain
    pub first_serial: Option<u64>,
    /// Defaults to the last record of the chain
    pub last_serial: Option<u64>,
    pub omit_payload: bool,
}

impl RecordFilter {
    pub fn serials(first: u64, last: u64) -> Self {
        Self {
            first_serial: Some(first),
            last_serial: Some(last),
            omit_payload: false,
        }
    }

    pub fn without_payload(mut self) -> Self {
        self.omit_payload = true;
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        // The node spells this parameter with a double m
        let mut query = vec![("ommitPayload", self.omit_payload.to_string())];
        query.extend(self.serial_query());
        query
    }

    /// Serial range only, for listings that always carry the payload
    pub(crate) fn serial_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(first) = self.first_serial {
            query.push(("firstSerial", first.to_string()));
        }
        if let Some(last) = self.last_serial {
            query.push(("lastSerial", last.to_string()));
        }
        query
    }
}

/// Record with its payload mapped to JSON by the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAsJson {
    #[serde(flatten)]
    pub info: RecordInfo,
    #[serde(default)]
    pub payload: Value,
}

/// InterlockQL query over the records of a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub query: String,
    /// How many records to return, all when unset or zero
    pub how_many: Option<u64>,
    /// Only honored by the raw record query
    pub omit_payload: bool,
}

impl RecordQuery {
    pub fn new(interlock_ql: impl Into<String>) -> Self {
        Self {
            query: interlock_ql.into(),
            how_many: None,
            omit_payload: false,
        }
    }

    pub fn with_how_many(mut self, how_many: u64) -> Self {
        self.how_many = Some(how_many);
        self
    }

    pub fn without_payload(mut self) -> Self {
        self.omit_payload = true;
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("queryAsInterlockQL", self.query.clone())];
        if let Some(how_many) = self.how_many {
            query.push(("howMany", how_many.to_string()));
        }
        query
    }
}
