// Test utilities for IL2 crates
//
// This crate provides test-specific functionality that should not be available
// in production builds: throw-away PKCS#12 identities and the encrypting side
// of JSON documents, which in production only the node performs.

use anyhow::{anyhow, Result};
use il2_common::logging::{Component, Logger};
use il2_keys::certificate::CertificateIdentity;
use il2_keys::encoding::encode_url;
use il2_keys::encryption::{EncryptedText, ReadingKey};
use il2_keys::iltag::JSON_PAYLOAD_MARKER;
use il2_keys::types::CipherAlgorithm;
use il2_keys::{ilint, Pkcs12Certificate};
use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::rsa::{Padding, Rsa};
use openssl::symm::{self, Cipher};
use openssl::x509::{X509NameBuilder, X509};
use serde_json::Value;
use std::path::PathBuf;

pub const TEST_PASSWORD: &str = "il2-test";

/// Logger for tests
pub fn create_test_logger(name: &str) -> Logger {
    Logger::new_root(Component::Custom("Test"), name)
}

/// A generated identity, both as PKCS#12 bytes and loaded
pub struct TestIdentity {
    pub pfx_der: Vec<u8>,
    pub password: String,
    pub certificate: Pkcs12Certificate,
}

impl TestIdentity {
    /// Write the PKCS#12 container to `dir`, returning its path
    pub fn write_pfx(&self, dir: &tempfile::TempDir, file_name: &str) -> Result<PathBuf> {
        let path = dir.path().join(file_name);
        std::fs::write(&path, &self.pfx_der)?;
        Ok(path)
    }

    /// Load the same container again
    pub fn reload(&self) -> Result<Pkcs12Certificate> {
        Ok(Pkcs12Certificate::from_der(&self.pfx_der, &self.password)?)
    }

    /// The same certificate without its private key
    pub fn public_only(&self) -> Result<Pkcs12Certificate> {
        Ok(Pkcs12Certificate::from_parts(
            self.certificate.certificate().clone(),
            None,
        )?)
    }
}

/// RSA 2048 identity with a self-signed certificate
pub fn rsa_identity(common_name: &str) -> Result<TestIdentity> {
    let pkey = PKey::from_rsa(Rsa::generate(2048)?)?;
    identity_for_key(pkey, common_name)
}

/// P-256 identity, for non-RSA code paths
pub fn ec_identity(common_name: &str) -> Result<TestIdentity> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
    let pkey = PKey::from_ec_key(EcKey::generate(&group)?)?;
    identity_for_key(pkey, common_name)
}

fn identity_for_key(pkey: PKey<Private>, common_name: &str) -> Result<TestIdentity> {
    let cert = self_signed_certificate(&pkey, common_name)?;
    let pfx_der = Pkcs12::builder()
        .name(common_name)
        .pkey(&pkey)
        .cert(&cert)
        .build2(TEST_PASSWORD)?
        .to_der()?;
    let certificate = Pkcs12Certificate::from_der(&pfx_der, TEST_PASSWORD)?;
    Ok(TestIdentity {
        pfx_der,
        password: TEST_PASSWORD.to_string(),
        certificate,
    })
}

/// Self-signed X.509 v3 certificate valid for one year
pub fn self_signed_certificate(pkey: &PKey<Private>, common_name: &str) -> Result<X509> {
    let mut name = X509NameBuilder::new()?;
    name.append_entry_by_nid(Nid::COMMONNAME, common_name)?;
    let name = name.build();

    let serial = {
        let mut bn = BigNum::new()?;
        bn.rand(64, MsbOption::MAYBE_ZERO, false)?;
        bn.to_asn1_integer()?
    };

    let mut builder = X509::builder()?;
    builder.set_version(2)?;
    builder.set_serial_number(&serial)?;
    builder.set_subject_name(&name)?;
    builder.set_issuer_name(&name)?;
    builder.set_pubkey(pkey)?;
    let not_before = Asn1Time::days_from_now(0)?;
    let not_after = Asn1Time::days_from_now(365)?;
    builder.set_not_before(&not_before)?;
    builder.set_not_after(&not_after)?;
    builder.sign(pkey, MessageDigest::sha256())?;
    Ok(builder.build())
}

/// RSA-OAEP (SHA-1) encryption with the certificate's public key
pub fn oaep_wrap(certificate: &Pkcs12Certificate, data: &[u8]) -> Result<Vec<u8>> {
    let rsa = certificate.certificate().public_key()?.rsa()?;
    let mut out = vec![0u8; rsa.size() as usize];
    let len = rsa.public_encrypt(data, &mut out, Padding::PKCS1_OAEP)?;
    out.truncate(len);
    Ok(out)
}

/// `0x11 || ILInt(len) || json`
pub fn json_payload(json: &[u8]) -> Vec<u8> {
    let mut out = vec![JSON_PAYLOAD_MARKER];
    ilint::encode(json.len() as u64, &mut out);
    out.extend_from_slice(json);
    out
}

/// AES-CBC with PKCS#7 padding, variant chosen by key length
pub fn aes_cbc_encrypt(key: &[u8], iv: &[u8], plain: &[u8]) -> Result<Vec<u8>> {
    let cipher = match key.len() {
        16 => Cipher::aes_128_cbc(),
        24 => Cipher::aes_192_cbc(),
        32 => Cipher::aes_256_cbc(),
        other => return Err(anyhow!("invalid AES key length {other}")),
    };
    Ok(symm::encrypt(cipher, key, Some(iv), plain)?)
}

pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    openssl::rand::rand_bytes(&mut buf)?;
    Ok(buf)
}

/// Builds an [`EncryptedText`] the way the node does
pub struct EncryptedTextBuilder {
    cipher: Option<CipherAlgorithm>,
    key: Vec<u8>,
    iv: Vec<u8>,
    plain: Vec<u8>,
    reading_keys: Vec<ReadingKey>,
}

impl EncryptedTextBuilder {
    /// AES-256 with a random key and IV over the tagged JSON payload
    pub fn for_json(json: &Value) -> Result<Self> {
        let bytes = serde_json::to_vec(json)?;
        Ok(Self {
            cipher: Some(CipherAlgorithm::Aes256),
            key: random_bytes(32)?,
            iv: random_bytes(16)?,
            plain: json_payload(&bytes),
            reading_keys: Vec::new(),
        })
    }

    pub fn with_key(mut self, key: &[u8], iv: &[u8]) -> Self {
        self.key = key.to_vec();
        self.iv = iv.to_vec();
        self
    }

    pub fn with_cipher(mut self, cipher: Option<CipherAlgorithm>) -> Self {
        self.cipher = cipher;
        self
    }

    /// Replace the bytes that get AES encrypted
    pub fn with_plain_payload(mut self, plain: Vec<u8>) -> Self {
        self.plain = plain;
        self
    }

    /// Wrap key and IV for `reader`
    pub fn add_reader(mut self, reader: &Pkcs12Certificate) -> Result<Self> {
        let reading_key = ReadingKey {
            encrypted_iv: Some(encode_url(oaep_wrap(reader, &self.iv)?)),
            encrypted_key: Some(encode_url(oaep_wrap(reader, &self.key)?)),
            public_key_hash: reader.pub_key_hash(),
            reader_id: Some(reader.key_id()),
        };
        self.reading_keys.push(reading_key);
        Ok(self)
    }

    pub fn add_reading_key(mut self, reading_key: ReadingKey) -> Self {
        self.reading_keys.push(reading_key);
        self
    }

    pub fn build(self) -> Result<EncryptedText> {
        let cipher_text = aes_cbc_encrypt(&self.key, &self.iv, &self.plain)?;
        Ok(EncryptedText {
            cipher: self.cipher,
            cipher_text: encode_url(cipher_text),
            reading_keys: self.reading_keys,
        })
    }
}
