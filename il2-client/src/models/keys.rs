use il2_keys::{CertificateIdentity, KeyPurpose, Pkcs12Certificate};
use serde::{Deserialize, Serialize};

use super::apps::AppPermissions;

/// Key permitted to act on a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDetails {
    /// Key id, `Key!<hash>#SHA1`
    pub id: String,
    /// Must match the name the key was imported with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// IL2 text representation of the public key
    pub public_key: String,
    #[serde(default)]
    pub permissions: Vec<AppPermissions>,
    #[serde(default)]
    pub purposes: Vec<KeyPurpose>,
}

impl KeyDetails {
    /// Permit entry for an RSA certificate; `None` for other key types
    pub fn for_certificate(
        certificate: &Pkcs12Certificate,
        name: impl Into<String>,
        permissions: Vec<AppPermissions>,
        purposes: Vec<KeyPurpose>,
    ) -> Option<Self> {
        Some(Self {
            id: certificate.key_id(),
            name: Some(name.into()),
            public_key: certificate.pub_key()?,
            permissions,
            purposes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_details_wire_form() {
        let key: KeyDetails = serde_json::from_value(json!({
            "id": "Key!abc#SHA1",
            "name": "api",
            "publicKey": "PubKey!xyz#RSA",
            "permissions": ["#2,500,501", "#8"],
            "purposes": ["Action", "Protocol"]
        }))
        .unwrap();
        assert_eq!(key.permissions[0], AppPermissions::new(2, [500, 501]));
        assert_eq!(key.purposes, vec![KeyPurpose::Action, KeyPurpose::Protocol]);

        let back = serde_json::to_value(&key).unwrap();
        assert_eq!(back["permissions"], json!(["#2,500,501", "#8"]));
        assert_eq!(back["publicKey"], "PubKey!xyz#RSA");
    }
}
