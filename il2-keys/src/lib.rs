//! IL2 Keys – public API facade
//!
//! Local certificate identities, the IL tag codec and decoding of encrypted
//! JSON documents returned by an InterlockLedger node.

#[macro_use]
mod macros;

pub mod certificate;
pub mod encoding;
pub mod encryption;
pub mod error;
pub mod ilint;
pub mod iltag;
pub mod types;

pub use certificate::{CertificateIdentity, Pkcs12Certificate};

pub use encryption::{EncryptedText, ReadingKey};

pub use error::{DecodeError, ErrorKind, KeyError, Result};

pub use types::{
    Algorithm, CipherAlgorithm, DataFieldCast, HashAlgorithm, KeyPurpose, KeyStrength, RecordType,
};
