use il2_keys::{Algorithm, KeyError, KeyPurpose, KeyStrength, Pkcs12Certificate};
use serde::{Deserialize, Serialize};

use super::apps::AppPermissions;

/// Chain summary as listed by the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainId {
    pub id: String,
    /// The chain no longer accepts records
    #[serde(rename = "isClosedForNewTransactions", default)]
    pub closed: bool,
    /// Serial of the last record
    #[serde(default)]
    pub last_record: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licensing_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub size_in_bytes: u64,
}

/// Key file exported when a chain is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedKeyFile {
    /// Base64 key file contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file_bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainCreated {
    #[serde(flatten)]
    pub chain: ChainId,
    #[serde(default)]
    pub key_files: Vec<ExportedKeyFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    #[serde(flatten)]
    pub chain: ChainId,
    /// Numeric ids of the apps permitted on the chain
    #[serde(default)]
    pub active_apps: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mirror copy of a chain hosted elsewhere
    #[serde(default)]
    pub is_mirror: bool,
}

/// Certificate to permit on a new chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePermit {
    /// Must match the name the key was imported with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub permissions: Vec<AppPermissions>,
    pub purposes: Vec<KeyPurpose>,
    /// PEM body of the certificate, without armor or line breaks
    #[serde(rename = "certificateInX509")]
    pub certificate_in_x509: String,
}

impl CertificatePermit {
    pub fn for_certificate(
        certificate: &Pkcs12Certificate,
        name: impl Into<String>,
        permissions: Vec<AppPermissions>,
        purposes: Vec<KeyPurpose>,
    ) -> Result<Self, KeyError> {
        Ok(Self {
            name: Some(name.into()),
            permissions,
            purposes,
            certificate_in_x509: certificate.public_certificate_x509()?,
        })
    }
}

/// Parameters of a new chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainCreation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub management_key_password: String,
    pub management_key_strength: KeyStrength,
    pub emergency_closing_key_password: String,
    pub emergency_closing_key_strength: KeyStrength,
    pub operating_key_strength: KeyStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_key_algorithm: Option<Algorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_algorithm: Option<Algorithm>,
    /// Numeric ids of apps to permit besides the defaults
    #[serde(default)]
    pub additional_apps: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_certificates: Option<Vec<CertificatePermit>>,
    /// Parent chain id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl ChainCreation {
    pub fn new(
        name: impl Into<String>,
        management_key_password: impl Into<String>,
        emergency_closing_key_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            management_key_password: management_key_password.into(),
            management_key_strength: KeyStrength::Strong,
            emergency_closing_key_password: emergency_closing_key_password.into(),
            emergency_closing_key_strength: KeyStrength::ExtraStrong,
            operating_key_strength: KeyStrength::Normal,
            operating_key_algorithm: None,
            keys_algorithm: None,
            additional_apps: Vec::new(),
            api_certificates: None,
            parent: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_additional_apps(mut self, apps: Vec<u64>) -> Self {
        self.additional_apps = apps;
        self
    }

    pub fn with_api_certificate(mut self, permit: CertificatePermit) -> Self {
        self.api_certificates.get_or_insert_with(Vec::new).push(permit);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Name and both passwords must be non-empty
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("managementKeyPassword", &self.management_key_password),
            ("emergencyClosingKeyPassword", &self.emergency_closing_key_password),
        ];
        match required.iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(format!("{} must not be empty", field)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chain_id_reads_closed_flag() {
        let chain: ChainId = serde_json::from_value(json!({
            "id": "abc",
            "isClosedForNewTransactions": true,
            "lastRecord": 12,
            "lastUpdate": "2024-05-01T10:00:00+00:00",
            "name": "Main",
            "sizeInBytes": 2048
        }))
        .unwrap();
        assert!(chain.closed);
        assert_eq!(chain.last_record, 12);
        assert_eq!(chain.name.as_deref(), Some("Main"));
    }

    #[test]
    fn summary_flattens_chain_fields() {
        let summary: ChainSummary = serde_json::from_value(json!({
            "id": "abc",
            "activeApps": [4, 8],
            "isMirror": true
        }))
        .unwrap();
        assert_eq!(summary.chain.id, "abc");
        assert_eq!(summary.active_apps, vec![4, 8]);
        assert!(summary.is_mirror);
    }

    #[test]
    fn creation_defaults_and_wire_names() {
        let creation = ChainCreation::new("Docs", "mgmt", "emergency").with_additional_apps(vec![8]);
        assert!(creation.validate().is_ok());

        let value = serde_json::to_value(&creation).unwrap();
        assert_eq!(value["managementKeyStrength"], "Strong");
        assert_eq!(value["emergencyClosingKeyStrength"], "ExtraStrong");
        assert_eq!(value["operatingKeyStrength"], "Normal");
        assert_eq!(value["additionalApps"], json!([8]));
        assert!(value.get("parent").is_none());

        let err = ChainCreation::new("", "a", "b").validate().unwrap_err();
        assert!(err.contains("name"));
    }
}
