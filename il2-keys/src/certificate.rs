//! Local certificate identities
//!
//! A [`Pkcs12Certificate`] wraps the client identity loaded from a `.pfx` file:
//! the X.509 certificate, the optional private key and the identifiers the
//! IL2 node uses to address it as a reader of encrypted JSON documents.

use std::path::{Path, PathBuf};

use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{Id, PKey, Private, Public};
use openssl::rsa::Padding;
use openssl::x509::X509;
use sha2::{Digest, Sha256};

use crate::encoding::encode_url;
use crate::error::{KeyError, Result};
use crate::iltag::{RawTag, RAW_BYTES_TAG_ID, RSA_PARAMETERS_TAG_ID};

/// Capabilities the encrypted payload resolver needs from a credential.
///
/// Implemented by [`Pkcs12Certificate`]; other credential stores (HSM, OS
/// keychain) only have to provide these four operations.
pub trait CertificateIdentity {
    /// True iff the identity can decrypt.
    fn has_private_key(&self) -> bool;

    /// `Key!<base64url(SHA1(DER certificate))>#SHA1`
    fn key_id(&self) -> String;

    /// `<base64url(SHA256(RSA parameters tag))>#SHA256`, `None` for non-RSA keys.
    fn pub_key_hash(&self) -> Option<String>;

    /// RSA-OAEP decryption, SHA-1 for both the hash and MGF1, no label.
    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>>;
}

/// Certificate and optional private key read from a PKCS#12 container
#[derive(Clone)]
pub struct Pkcs12Certificate {
    certificate: X509,
    /// DER bytes of `certificate`
    der_bytes: Vec<u8>,
    public_key: PKey<Public>,
    private_key: Option<PKey<Private>>,
    friendly_name: String,
}

impl std::fmt::Debug for Pkcs12Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pkcs12Certificate")
            .field("common_name", &self.common_name())
            .field("key_id", &self.key_id())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

impl Pkcs12Certificate {
    /// Load a `.pfx` file. A leading `~` is expanded to the home directory.
    pub fn from_file(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = expand_home(path.as_ref());
        let der = std::fs::read(&path)?;
        Self::from_der(&der, password).map_err(|e| match e {
            KeyError::CertificateError(msg) => {
                KeyError::CertificateError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse a DER encoded PKCS#12 container
    pub fn from_der(pkcs12_der: &[u8], password: &str) -> Result<Self> {
        let parsed = Pkcs12::from_der(pkcs12_der)
            .and_then(|pkcs12| pkcs12.parse2(password))
            .map_err(|e| {
                KeyError::CertificateError(format!("Failed to open PKCS#12 container: {}", e))
            })?;

        let certificate = parsed.cert.ok_or_else(|| {
            KeyError::CertificateError("PKCS#12 container holds no certificate".to_string())
        })?;

        Self::from_parts(certificate, parsed.pkey)
    }

    /// Build from an already loaded certificate and optional private key
    pub fn from_parts(certificate: X509, private_key: Option<PKey<Private>>) -> Result<Self> {
        let der_bytes = certificate.to_der().map_err(|e| {
            KeyError::CertificateError(format!("Failed to encode certificate: {}", e))
        })?;
        let public_key = certificate.public_key().map_err(|e| {
            KeyError::CertificateError(format!("Failed to read certificate public key: {}", e))
        })?;
        let friendly_name = certificate
            .alias()
            .map(|alias| String::from_utf8_lossy(alias).into_owned())
            .unwrap_or_default();

        Ok(Self {
            certificate,
            der_bytes,
            public_key,
            private_key,
            friendly_name,
        })
    }

    /// Subject common name, empty if the certificate has none
    pub fn common_name(&self) -> String {
        self.certificate
            .subject_name()
            .entries_by_nid(Nid::COMMONNAME)
            .next()
            .and_then(|entry| std::str::from_utf8(entry.data().as_slice()).ok())
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// PKCS#12 friendly name, empty if the container did not carry one
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }

    pub fn public_certificate_der(&self) -> &[u8] {
        &self.der_bytes
    }

    pub fn public_certificate_pem(&self) -> Result<Vec<u8>> {
        Ok(self.certificate.to_pem()?)
    }

    /// PEM body without armor lines or newlines, the form the node expects in
    /// certificate permits
    pub fn public_certificate_x509(&self) -> Result<String> {
        let pem = String::from_utf8(self.public_certificate_pem()?)
            .map_err(|e| KeyError::EncodingError(format!("Certificate PEM is not UTF-8: {}", e)))?;
        Ok(pem
            .lines()
            .filter(|line| !line.starts_with("-----"))
            .collect::<String>())
    }

    /// Private key as unencrypted PKCS#8 PEM, for building the TLS client identity
    pub fn private_key_pem(&self) -> Result<Vec<u8>> {
        let key = self.private_key.as_ref().ok_or(KeyError::NoPrivateKey)?;
        Ok(key.private_key_to_pem_pkcs8()?)
    }

    /// Modulus as big-endian bytes, `None` for non-RSA keys
    pub fn public_modulus(&self) -> Option<Vec<u8>> {
        let rsa = self.rsa_public_key()?;
        Some(rsa.n().to_vec())
    }

    /// Public exponent as big-endian bytes, `None` for non-RSA keys
    pub fn public_exponent(&self) -> Option<Vec<u8>> {
        let rsa = self.rsa_public_key()?;
        Some(rsa.e().to_vec())
    }

    fn rsa_public_key(&self) -> Option<openssl::rsa::Rsa<Public>> {
        if self.public_key.id() != Id::RSA {
            return None;
        }
        self.public_key.rsa().ok()
    }

    /// Encoded RSA public key parameters:
    /// `tag40( tag16(modulus) || tag16(exponent) )`.
    ///
    /// The node hashes these exact bytes, so modulus and exponent are written
    /// as unsigned big-endian integers without leading zero bytes.
    pub fn format_public_key_parameters(&self) -> Option<Vec<u8>> {
        let modulus = RawTag::new(RAW_BYTES_TAG_ID, self.public_modulus()?);
        let exponent = RawTag::new(RAW_BYTES_TAG_ID, self.public_exponent()?);

        let mut parameters = Vec::with_capacity(modulus.encoded_len() + exponent.encoded_len());
        modulus.encode_into(&mut parameters);
        exponent.encode_into(&mut parameters);

        Some(RawTag::new(RSA_PARAMETERS_TAG_ID, parameters).encode())
    }

    /// `PubKey!<base64url(RSA parameters tag)>#RSA`, the text form sent in `X-PubKey`
    pub fn pub_key(&self) -> Option<String> {
        let parameters = self.format_public_key_parameters()?;
        Some(format!("PubKey!{}#RSA", encode_url(parameters)))
    }
}

impl CertificateIdentity for Pkcs12Certificate {
    fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    fn key_id(&self) -> String {
        let digest = openssl::sha::sha1(&self.der_bytes);
        format!("Key!{}#SHA1", encode_url(digest))
    }

    fn pub_key_hash(&self) -> Option<String> {
        let parameters = self.format_public_key_parameters()?;
        let digest = Sha256::digest(&parameters);
        Some(format!("{}#SHA256", encode_url(digest)))
    }

    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>> {
        let key = self.private_key.as_ref().ok_or(KeyError::NoPrivateKey)?;
        if key.id() != Id::RSA {
            return Err(KeyError::UnsupportedKeyType(format!(
                "RSA-OAEP needs an RSA private key, found {:?}",
                key.id()
            )));
        }
        let rsa = key.rsa()?;

        // PKCS1_OAEP uses SHA-1 and MGF1-SHA-1 with an empty label
        let mut plain = vec![0u8; rsa.size() as usize];
        let len = rsa
            .private_decrypt(cipher_text, &mut plain, Padding::PKCS1_OAEP)
            .map_err(|e| KeyError::DecryptionError(format!("RSA-OAEP decryption failed: {}", e)))?;
        plain.truncate(len);
        Ok(plain)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
