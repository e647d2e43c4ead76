//! Encrypted JSON documents.
//!
//! The node encrypts a JSON document once with a fresh AES key and IV, and
//! wraps that key and IV with RSA-OAEP for every allowed reader. Decoding:
//!
//! 1. check the cipher (only `AES256`)
//! 2. find the reading key addressed to the certificate (key id and public
//!    key hash must both match)
//! 3. unwrap AES key and IV with the certificate's private key
//! 4. AES-CBC decrypt the cipher text
//! 5. strip the `0x11 || ILInt(len)` header
//! 6. parse the UTF-8 JSON

use il2_common::logging::Logger;
use il2_common::{log_debug, log_warn};
use openssl::symm::{self, Cipher};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::certificate::CertificateIdentity;
use crate::encoding::decode_url;
use crate::error::{DecodeError, ErrorKind};
use crate::ilint;
use crate::iltag::JSON_PAYLOAD_MARKER;
use crate::types::CipherAlgorithm;

pub const AES_BLOCK_LEN: usize = 16;

/// One reader's wrapped copy of the document key and IV
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingKey {
    /// RSA-OAEP wrapped AES IV, base64url
    #[serde(rename = "encryptedIV", default, skip_serializing_if = "Option::is_none")]
    pub encrypted_iv: Option<String>,
    /// RSA-OAEP wrapped AES key, base64url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_key: Option<String>,
    /// Reader public key hash in IL2 text representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hash: Option<String>,
    /// Reader key id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader_id: Option<String>,
}

impl ReadingKey {
    /// True when this entry is addressed to `certificate`.
    ///
    /// Both the key id and the public key hash have to agree; a certificate
    /// without an RSA public key hash never matches.
    pub fn matches(&self, certificate: &dyn CertificateIdentity) -> bool {
        self.matches_ids(&certificate.key_id(), certificate.pub_key_hash().as_deref())
    }

    fn matches_ids(&self, key_id: &str, pub_key_hash: Option<&str>) -> bool {
        match (self.reader_id.as_deref(), self.public_key_hash.as_deref(), pub_key_hash) {
            (Some(reader_id), Some(entry_hash), Some(cert_hash)) => {
                reader_id == key_id && entry_hash == cert_hash
            }
            _ => false,
        }
    }
}

/// Encrypted text of a JSON document record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<CipherAlgorithm>,
    /// AES-CBC cipher text, base64url
    #[serde(default)]
    pub cipher_text: String,
    #[serde(default)]
    pub reading_keys: Vec<ReadingKey>,
}

impl EncryptedText {
    /// Decode the document with `certificate`.
    pub fn decode(&self, certificate: &dyn CertificateIdentity) -> Result<Value, DecodeError> {
        self.decode_inner(certificate, None)
    }

    /// Same as [`EncryptedText::decode`], reporting the outcome on `logger`.
    pub fn decode_with_logger(
        &self,
        certificate: &dyn CertificateIdentity,
        logger: &Logger,
    ) -> Result<Value, DecodeError> {
        self.decode_inner(certificate, Some(logger))
    }

    /// Decode straight into a typed value.
    pub fn decode_as<T: DeserializeOwned>(
        &self,
        certificate: &dyn CertificateIdentity,
    ) -> Result<T, DecodeError> {
        let value = self.decode(certificate)?;
        Ok(serde_json::from_value(value)?)
    }

    /// First reading key addressed to `certificate`.
    pub fn find_reading_key(
        &self,
        certificate: &dyn CertificateIdentity,
    ) -> Result<&ReadingKey, DecodeError> {
        if !certificate.has_private_key() {
            return Err(DecodeError::NoPrivateKey);
        }
        let key_id = certificate.key_id();
        let pub_key_hash = certificate.pub_key_hash();

        self.reading_keys
            .iter()
            .find(|rk| rk.matches_ids(&key_id, pub_key_hash.as_deref()))
            .ok_or(DecodeError::NoMatchingReadingKey)
    }

    fn decode_inner(
        &self,
        certificate: &dyn CertificateIdentity,
        logger: Option<&Logger>,
    ) -> Result<Value, DecodeError> {
        let result = self.decrypt_json(certificate);

        if let Some(logger) = logger {
            match &result {
                Ok(_) => log_debug!(logger, "Decoded encrypted JSON document"),
                Err(e) if e.kind() == ErrorKind::Corruption => {
                    log_warn!(logger, "Encrypted JSON document could not be decoded: {}", e)
                }
                Err(e) => log_debug!(logger, "Encrypted JSON document not decoded: {}", e),
            }
        }
        result
    }

    fn decrypt_json(&self, certificate: &dyn CertificateIdentity) -> Result<Value, DecodeError> {
        match &self.cipher {
            None => return Err(DecodeError::NoCipher),
            Some(cipher) if cipher.as_str().is_empty() => return Err(DecodeError::NoCipher),
            Some(CipherAlgorithm::Aes256) => {}
            Some(other) => return Err(DecodeError::UnsupportedCipher(other.to_string())),
        }

        let reading_key = self.find_reading_key(certificate)?;

        let aes_key = unwrap_field(certificate, reading_key.encrypted_key.as_deref(), "AES key")?;
        let aes_iv = unwrap_field(certificate, reading_key.encrypted_iv.as_deref(), "AES IV")?;

        let cipher_text = decode_url(&self.cipher_text).map_err(|e| DecodeError::InvalidBase64 {
            field: "cipherText",
            reason: e.to_string(),
        })?;
        let plain = aes_cbc_decrypt(&aes_key, &aes_iv, &cipher_text)?;

        let json = extract_json_payload(&plain)?;
        let text = std::str::from_utf8(json)?;
        Ok(serde_json::from_str(text)?)
    }
}

fn unwrap_field(
    certificate: &dyn CertificateIdentity,
    wrapped: Option<&str>,
    field: &'static str,
) -> Result<Vec<u8>, DecodeError> {
    let wrapped = wrapped.ok_or_else(|| DecodeError::KeyUnwrap {
        field,
        reason: "missing from reading key".to_string(),
    })?;
    let bytes = decode_url(wrapped).map_err(|e| DecodeError::InvalidBase64 {
        field,
        reason: e.to_string(),
    })?;
    certificate
        .decrypt(&bytes)
        .map_err(|e| DecodeError::KeyUnwrap {
            field,
            reason: e.to_string(),
        })
}

/// AES-CBC with PKCS#7 padding. The key length selects AES-128/192/256.
pub fn aes_cbc_decrypt(key: &[u8], iv: &[u8], cipher_text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let cipher = match key.len() {
        32 => Cipher::aes_256_cbc(),
        24 => Cipher::aes_192_cbc(),
        16 => Cipher::aes_128_cbc(),
        other => {
            return Err(DecodeError::PayloadDecryption(format!(
                "unwrapped AES key has invalid length {}",
                other
            )))
        }
    };
    if iv.len() != AES_BLOCK_LEN {
        return Err(DecodeError::PayloadDecryption(format!(
            "unwrapped AES IV has invalid length {}",
            iv.len()
        )));
    }
    symm::decrypt(cipher, key, Some(iv), cipher_text)
        .map_err(|e| DecodeError::PayloadDecryption(format!("AES-CBC failed: {}", e)))
}

/// Slice of JSON bytes inside a decrypted payload `0x11 || ILInt(len) || json || ...`.
///
/// Bytes past the declared length are ignored.
pub fn extract_json_payload(plain: &[u8]) -> Result<&[u8], DecodeError> {
    match plain.first() {
        Some(&JSON_PAYLOAD_MARKER) => {}
        Some(&other) => return Err(DecodeError::UnexpectedInitialByte(other)),
        None => return Err(DecodeError::MalformedHeader("empty payload".to_string())),
    }

    let (declared, used) =
        ilint::decode(&plain[1..]).map_err(|e| DecodeError::MalformedHeader(e.to_string()))?;
    let start = 1 + used;
    let available = plain.len() - start;

    match usize::try_from(declared) {
        Ok(len) if len <= available => Ok(&plain[start..start + len]),
        _ => Err(DecodeError::TruncatedPayload {
            declared,
            available,
        }),
    }
}
