//! Enumerations shared with the IL2 node.
//!
//! Every variant carries its wire string literally; see `wire_enum!`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

wire_enum! {
    /// Digital signature algorithms available in IL2.
    pub enum Algorithm {
        /// PKCS#1 RSASSA-PSS
        Rsa => "RSA",
        /// RSASSA-PKCS1-v1_5
        Rsa15 => "RSA15",
        Dsa => "DSA",
        ElGamal => "ElGamal",
        EcDsa => "EcDSA",
        EdDsa => "EdDSA",
    }
}

wire_enum! {
    /// Casting applied to an app data field.
    pub enum DataFieldCast {
        None => "None",
        DateTime => "DateTime",
        Integer => "Integer",
        TimeSpan => "TimeSpan",
    }
}

wire_enum! {
    /// Hash algorithms available in IL2.
    pub enum HashAlgorithm {
        Sha256 => "SHA256",
        Sha1 => "SHA1",
        Sha512 => "SHA512",
        Sha3_256 => "SHA3_256",
        Sha3_512 => "SHA3_512",
        Copy => "Copy",
    }
}

wire_enum! {
    /// Purposes a key can be granted on a chain.
    pub enum KeyPurpose {
        Action => "Action",
        ChainOperation => "ChainOperation",
        Encryption => "Encryption",
        ForceInterlock => "ForceInterlock",
        KeyManagement => "KeyManagement",
        Protocol => "Protocol",
        InvalidKey => "InvalidKey",
        ClaimSigner => "ClaimSigner",
    }
}

wire_enum! {
    /// Strength of generated keys.
    pub enum KeyStrength {
        Normal => "Normal",
        Strong => "Strong",
        ExtraStrong => "ExtraStrong",
        MegaStrong => "MegaStrong",
        SuperStrong => "SuperStrong",
        HyperStrong => "HyperStrong",
        UltraStrong => "UltraStrong",
    }
}

impl KeyStrength {
    /// RSA modulus size in bits
    pub fn rsa_bits(&self) -> u32 {
        match self {
            KeyStrength::Normal => 2048,
            KeyStrength::Strong => 3072,
            KeyStrength::ExtraStrong => 4096,
            KeyStrength::MegaStrong => 5120,
            KeyStrength::SuperStrong => 6144,
            KeyStrength::HyperStrong => 7168,
            KeyStrength::UltraStrong => 8192,
        }
    }
}

wire_enum! {
    /// Types of records stored in a chain.
    pub enum RecordType {
        Data => "Data",
        Root => "Root",
        Closing => "Closing",
        EmergencyClosing => "EmergencyClosing",
        Corrupted => "Corrupted",
    }
}

/* ------------------------------ Cipher ----------------------------------- */

/// Cipher used on an encrypted JSON document.
///
/// Unrecognized wire values are kept in `Unknown` so a decode failure can
/// name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CipherAlgorithm {
    None,
    Aes256,
    Unknown(String),
}

impl CipherAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            CipherAlgorithm::None => "None",
            CipherAlgorithm::Aes256 => "AES256",
            CipherAlgorithm::Unknown(value) => value,
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value {
            "None" => CipherAlgorithm::None,
            "AES256" => CipherAlgorithm::Aes256,
            other => CipherAlgorithm::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CipherAlgorithm {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CipherAlgorithm {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_are_literal() {
        assert_eq!(KeyPurpose::ChainOperation.as_str(), "ChainOperation");
        assert_eq!(HashAlgorithm::Sha3_256.to_string(), "SHA3_256");
        assert_eq!(Algorithm::EcDsa.as_str(), "EcDSA");
        assert_eq!(DataFieldCast::TimeSpan.as_str(), "TimeSpan");
        assert_eq!(
            serde_json::to_string(&RecordType::EmergencyClosing).unwrap(),
            "\"EmergencyClosing\""
        );
    }

    #[test]
    fn every_variant_parses_back() {
        for purpose in KeyPurpose::ALL {
            assert_eq!(purpose.as_str().parse::<KeyPurpose>().unwrap(), *purpose);
        }
        assert!("Sha256".parse::<HashAlgorithm>().is_err());
        assert!(serde_json::from_str::<KeyStrength>("\"Weak\"").is_err());
    }

    #[test]
    fn unknown_cipher_keeps_its_name() {
        let cipher: CipherAlgorithm = serde_json::from_str("\"RC4\"").unwrap();
        assert_eq!(cipher, CipherAlgorithm::Unknown("RC4".to_string()));
        assert_eq!(cipher.to_string(), "RC4");
        assert_eq!(
            serde_json::from_str::<CipherAlgorithm>("\"AES256\"").unwrap(),
            CipherAlgorithm::Aes256
        );
    }

    #[test]
    fn strengths_map_to_rsa_bits() {
        assert_eq!(KeyStrength::Normal.rsa_bits(), 2048);
        assert_eq!(KeyStrength::HyperStrong.rsa_bits(), 7168);
        assert_eq!(KeyStrength::UltraStrong.rsa_bits(), 8192);
    }
}
