use il2_common::logging::Logger;
use il2_keys::{CertificateIdentity, DecodeError, EncryptedText, Pkcs12Certificate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::RecordInfo;
use crate::error::{ClientError, Result};

/// JSON document record.
///
/// The node returns either `encryptedJson` or, for documents the caller may
/// read in clear, `jsonText`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDocument {
    #[serde(flatten)]
    pub info: RecordInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_json: Option<EncryptedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_text: Option<String>,
}

impl JsonDocument {
    /// Document contents, decrypted with `certificate` when encrypted
    pub fn decode(&self, certificate: &dyn CertificateIdentity) -> Result<Value> {
        self.decode_inner(certificate, None)
    }

    /// Same as [`JsonDocument::decode`], logging the decryption outcome
    pub fn decode_with_logger(
        &self,
        certificate: &dyn CertificateIdentity,
        logger: &Logger,
    ) -> Result<Value> {
        self.decode_inner(certificate, Some(logger))
    }

    fn decode_inner(
        &self,
        certificate: &dyn CertificateIdentity,
        logger: Option<&Logger>,
    ) -> Result<Value> {
        match (&self.encrypted_json, &self.json_text) {
            (Some(encrypted), _) => Ok(match logger {
                Some(logger) => encrypted.decode_with_logger(certificate, logger)?,
                None => encrypted.decode(certificate)?,
            }),
            (None, Some(text)) => Ok(serde_json::from_str(text)?),
            (None, None) => Err(ClientError::Decode(DecodeError::NoCipher)),
        }
    }

    pub fn decode_as<T: DeserializeOwned>(&self, certificate: &dyn CertificateIdentity) -> Result<T> {
        Ok(serde_json::from_value(self.decode(certificate)?)?)
    }
}

/// Reader allowed to decrypt documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderKey {
    pub name: String,
    /// IL2 text representation of the reader's public key
    pub public_key: String,
}

impl ReaderKey {
    /// `None` for certificates without an RSA key
    pub fn for_certificate(name: impl Into<String>, certificate: &Pkcs12Certificate) -> Option<Self> {
        Some(Self {
            name: name.into(),
            public_key: certificate.pub_key()?,
        })
    }
}

/// Named list of readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedReaders {
    pub context_id: String,
    #[serde(default)]
    pub readers: Vec<ReaderKey>,
}

impl AllowedReaders {
    pub fn new(context_id: impl Into<String>, readers: Vec<ReaderKey>) -> Self {
        Self {
            context_id: context_id.into(),
            readers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedReadersDetails {
    #[serde(flatten)]
    pub allowed: AllowedReaders,
    /// `chainId@serial` of the record holding the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_reference: Option<String>,
}
