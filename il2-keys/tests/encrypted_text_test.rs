//! End-to-end tests for decoding encrypted JSON documents
//!
//! The encrypting side lives in il2-test-utils and mirrors what the node
//! does: tag the JSON, AES-CBC encrypt it and wrap key and IV per reader.

use anyhow::Result;
use il2_keys::certificate::CertificateIdentity;
use il2_keys::encoding::encode_url;
use il2_keys::encryption::{EncryptedText, ReadingKey};
use il2_keys::types::CipherAlgorithm;
use il2_keys::{DecodeError, ErrorKind};
use il2_test_utils::{
    aes_cbc_encrypt, create_test_logger, ec_identity, json_payload, oaep_wrap, rsa_identity,
    EncryptedTextBuilder,
};
use serde::Deserialize;
use serde_json::json;

#[test]
fn test_concrete_scenario_with_sixteen_byte_key() -> Result<()> {
    let recipient = rsa_identity("recipient")?;
    let cert = &recipient.certificate;

    let key = *b"0123456789abcdef";
    let iv = *b"fedcba9876543210";
    let json_bytes = br#"{"attr":"value"}"#;
    assert_eq!(json_bytes.len(), 16);

    let mut plain = vec![0x11, 16];
    plain.extend_from_slice(json_bytes);
    let cipher_text = aes_cbc_encrypt(&key, &iv, &plain)?;

    let encrypted = EncryptedText {
        cipher: Some(CipherAlgorithm::Aes256),
        cipher_text: encode_url(cipher_text),
        reading_keys: vec![ReadingKey {
            encrypted_key: Some(encode_url(oaep_wrap(cert, &key)?)),
            encrypted_iv: Some(encode_url(oaep_wrap(cert, &iv)?)),
            reader_id: Some(cert.key_id()),
            public_key_hash: cert.pub_key_hash(),
        }],
    };

    assert_eq!(encrypted.decode(cert)?, json!({"attr": "value"}));
    Ok(())
}

#[test]
fn test_round_trip_through_node_json() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let document = json!({
        "name": "Ledger entry",
        "amount": 1234.5,
        "tags": ["a", "b"],
        "nested": {"ok": true, "none": null},
        "text": "ção ✓",
    });

    let encrypted = EncryptedTextBuilder::for_json(&document)?
        .add_reader(&reader.certificate)?
        .build()?;

    // Through the node's wire format and back
    let wire = serde_json::to_string(&encrypted)?;
    assert!(wire.contains("\"encryptedIV\""));
    assert!(wire.contains("\"cipherText\""));
    let received: EncryptedText = serde_json::from_str(&wire)?;

    let logger = create_test_logger("round-trip");
    assert_eq!(received.decode_with_logger(&reader.certificate, &logger)?, document);
    Ok(())
}

#[test]
fn test_each_of_several_readers_can_decode() -> Result<()> {
    let alice = rsa_identity("alice")?;
    let bob = rsa_identity("bob")?;
    let carol = rsa_identity("carol")?;
    let document = json!({"shared": [1, 2, 3]});

    let encrypted = EncryptedTextBuilder::for_json(&document)?
        .add_reader(&alice.certificate)?
        .add_reader(&bob.certificate)?
        .build()?;

    assert_eq!(encrypted.decode(&alice.certificate)?, document);
    assert_eq!(encrypted.decode(&bob.certificate)?, document);

    let err = encrypted.decode(&carol.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::NoMatchingReadingKey));
    assert!(err.is_not_authorized());
    Ok(())
}

#[test]
fn test_non_recipient_is_not_authorized() -> Result<()> {
    let a = rsa_identity("a")?;
    let b = rsa_identity("b")?;

    let encrypted = EncryptedTextBuilder::for_json(&json!({"secret": 1}))?
        .add_reader(&b.certificate)?
        .build()?;

    let err = encrypted.decode(&a.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::NoMatchingReadingKey));
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    Ok(())
}

#[test]
fn test_partial_matches_are_rejected() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let other = rsa_identity("other")?;
    let cert = &reader.certificate;

    let id_only = ReadingKey {
        reader_id: Some(cert.key_id()),
        public_key_hash: other.certificate.pub_key_hash(),
        ..Default::default()
    };
    let hash_only = ReadingKey {
        reader_id: Some(other.certificate.key_id()),
        public_key_hash: cert.pub_key_hash(),
        ..Default::default()
    };
    assert!(!id_only.matches(cert));
    assert!(!hash_only.matches(cert));

    // Entries carry wrapped keys that would work, but neither fully matches
    let mut encrypted = EncryptedTextBuilder::for_json(&json!({"x": 1}))?
        .add_reader(cert)?
        .build()?;
    for rk in encrypted.reading_keys.iter_mut() {
        rk.public_key_hash = other.certificate.pub_key_hash();
    }
    assert!(matches!(
        encrypted.decode(cert),
        Err(DecodeError::NoMatchingReadingKey)
    ));
    Ok(())
}

#[test]
fn test_first_matching_reading_key_wins() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let cert = &reader.certificate;

    let encrypted = EncryptedTextBuilder::for_json(&json!({"first": true}))?
        .add_reader(cert)?
        .add_reading_key(ReadingKey {
            encrypted_key: Some("AAAA".to_string()),
            encrypted_iv: Some("AAAA".to_string()),
            reader_id: Some(cert.key_id()),
            public_key_hash: cert.pub_key_hash(),
        })
        .build()?;

    let found = encrypted.find_reading_key(cert)?;
    assert_eq!(found, &encrypted.reading_keys[0]);
    assert_eq!(encrypted.decode(cert)?, json!({"first": true}));
    Ok(())
}

#[test]
fn test_unsupported_cipher_is_named() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let encrypted = EncryptedTextBuilder::for_json(&json!({}))?
        .add_reader(&reader.certificate)?
        .with_cipher(Some(CipherAlgorithm::Unknown("RC4".to_string())))
        .build()?;

    let err = encrypted.decode(&reader.certificate).unwrap_err();
    assert!(matches!(&err, DecodeError::UnsupportedCipher(name) if name == "RC4"));
    assert!(err.to_string().contains("RC4"));
    assert_eq!(err.kind(), ErrorKind::Precondition);

    let none = EncryptedText {
        cipher: Some(CipherAlgorithm::None),
        ..encrypted.clone()
    };
    assert!(matches!(
        none.decode(&reader.certificate),
        Err(DecodeError::UnsupportedCipher(name)) if name == "None"
    ));
    Ok(())
}

#[test]
fn test_cipher_is_checked_before_any_decryption() -> Result<()> {
    // No reading keys, no private key and garbage cipher text: the cipher
    // check still reports first.
    let identity = rsa_identity("public")?;
    let encrypted = EncryptedText {
        cipher: Some(CipherAlgorithm::Unknown("RC4".to_string())),
        cipher_text: "!!not base64!!".to_string(),
        reading_keys: Vec::new(),
    };
    assert!(matches!(
        encrypted.decode(&identity.public_only()?),
        Err(DecodeError::UnsupportedCipher(_))
    ));

    let missing: EncryptedText = serde_json::from_str(r#"{"cipherText": "", "readingKeys": []}"#)?;
    assert!(matches!(
        missing.decode(&identity.certificate),
        Err(DecodeError::NoCipher)
    ));
    Ok(())
}

#[test]
fn test_empty_cipher_counts_as_missing() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let encrypted = EncryptedTextBuilder::for_json(&json!({"x": 1}))?
        .add_reader(&reader.certificate)?
        .build()?;

    let mut wire = serde_json::to_value(&encrypted)?;
    wire["cipher"] = json!("");
    let empty: EncryptedText = serde_json::from_value(wire)?;

    let err = empty.decode(&reader.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::NoCipher));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    Ok(())
}

#[test]
fn test_certificate_without_private_key() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let encrypted = EncryptedTextBuilder::for_json(&json!({"x": 1}))?
        .add_reader(&reader.certificate)?
        .build()?;

    let err = encrypted.decode(&reader.public_only()?).unwrap_err();
    assert!(matches!(err, DecodeError::NoPrivateKey));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    Ok(())
}

#[test]
fn test_non_rsa_certificate_never_matches() -> Result<()> {
    let rsa_reader = rsa_identity("rsa")?;
    let ec_reader = ec_identity("ec")?;

    let encrypted = EncryptedTextBuilder::for_json(&json!({"x": 1}))?
        .add_reader(&rsa_reader.certificate)?
        .add_reading_key(ReadingKey {
            reader_id: Some(ec_reader.certificate.key_id()),
            public_key_hash: None,
            ..Default::default()
        })
        .build()?;

    assert!(matches!(
        encrypted.decode(&ec_reader.certificate),
        Err(DecodeError::NoMatchingReadingKey)
    ));
    Ok(())
}

#[test]
fn test_wrong_marker_byte_is_rejected() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let mut plain = json_payload(br#"{"a":1}"#);
    plain[0] = 0x10;

    let encrypted = EncryptedTextBuilder::for_json(&json!({}))?
        .with_plain_payload(plain)
        .add_reader(&reader.certificate)?
        .build()?;

    let err = encrypted.decode(&reader.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedInitialByte(0x10)));
    assert_eq!(err.kind(), ErrorKind::Corruption);
    Ok(())
}

#[test]
fn test_trailing_bytes_after_json_are_ignored() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let mut plain = json_payload(br#"{"a":1}"#);
    plain.extend_from_slice(b"\0\0garbage");

    let encrypted = EncryptedTextBuilder::for_json(&json!({}))?
        .with_plain_payload(plain)
        .add_reader(&reader.certificate)?
        .build()?;

    assert_eq!(encrypted.decode(&reader.certificate)?, json!({"a": 1}));
    Ok(())
}

#[test]
fn test_invalid_json_is_corruption() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let encrypted = EncryptedTextBuilder::for_json(&json!({}))?
        .with_plain_payload(json_payload(b"{not json"))
        .add_reader(&reader.certificate)?
        .build()?;

    let err = encrypted.decode(&reader.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
    assert_eq!(err.kind(), ErrorKind::Corruption);
    Ok(())
}

#[test]
fn test_tampered_ciphertext_fails_as_corruption() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let mut encrypted = EncryptedTextBuilder::for_json(&json!({"x": "y"}))?
        .add_reader(&reader.certificate)?
        .build()?;

    // Swap in cipher text produced under a different key
    let foreign = aes_cbc_encrypt(&[7u8; 32], &[9u8; 16], &json_payload(b"{}"))?;
    encrypted.cipher_text = encode_url(foreign);

    let err = encrypted.decode(&reader.certificate).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Corruption);
    Ok(())
}

#[test]
fn test_corrupt_wrapped_key_is_an_unwrap_error() -> Result<()> {
    let reader = rsa_identity("reader")?;
    let mut encrypted = EncryptedTextBuilder::for_json(&json!({"x": 1}))?
        .add_reader(&reader.certificate)?
        .build()?;
    encrypted.reading_keys[0].encrypted_key = Some(encode_url([0u8; 256]));

    let err = encrypted.decode(&reader.certificate).unwrap_err();
    assert!(matches!(err, DecodeError::KeyUnwrap { field: "AES key", .. }));
    assert_eq!(err.kind(), ErrorKind::Corruption);
    Ok(())
}

#[test]
fn test_decode_as_typed_value() -> Result<()> {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Invoice {
        invoice_id: u32,
        paid: bool,
    }

    let reader = rsa_identity("reader")?;
    let encrypted = EncryptedTextBuilder::for_json(&json!({"invoiceId": 42, "paid": false}))?
        .add_reader(&reader.certificate)?
        .build()?;

    let invoice: Invoice = encrypted.decode_as(&reader.certificate)?;
    assert_eq!(
        invoice,
        Invoice {
            invoice_id: 42,
            paid: false
        }
    );
    Ok(())
}
