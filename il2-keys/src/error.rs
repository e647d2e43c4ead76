use thiserror::Error;

/// Error types for certificate handling and the IL tag codec
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Certificate error: {0}")]
    CertificateError(String),

    #[error("Certificate has no private key")]
    NoPrivateKey,

    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Decryption error: {0}")]
    DecryptionError(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<openssl::error::ErrorStack> for KeyError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        KeyError::CryptoError(err.to_string())
    }
}

/// Result type for il2-keys operations
pub type Result<T> = std::result::Result<T, KeyError>;

/// Coarse classification of [`DecodeError`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller misuse or unsupported input; fix the call, do not retry.
    Precondition,
    /// The certificate is simply not one of the readers.
    NotAuthorized,
    /// Wrong key, tampered ciphertext or format mismatch.
    Corruption,
}

/// Failure of [`crate::EncryptedText::decode`].
///
/// Messages name the step that failed and never include key material.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("No cipher specified")]
    NoCipher,

    #[error("Unsupported cipher {0}")]
    UnsupportedCipher(String),

    #[error("Certificate has no private key to decode the encrypted text")]
    NoPrivateKey,

    #[error("No authorized reading key matches this certificate")]
    NoMatchingReadingKey,

    #[error("Invalid base64 in {field}: {reason}")]
    InvalidBase64 { field: &'static str, reason: String },

    #[error("Failed to unwrap the {field}: {reason}")]
    KeyUnwrap { field: &'static str, reason: String },

    #[error("Failed to decrypt the cipher text: {0}")]
    PayloadDecryption(String),

    #[error("Unexpected initial byte {0:#04x} while decrypting")]
    UnexpectedInitialByte(u8),

    #[error("Malformed payload header: {0}")]
    MalformedHeader(String),

    #[error("Truncated payload: declared {declared} bytes but only {available} available")]
    TruncatedPayload { declared: u64, available: usize },

    #[error("Decrypted payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Decrypted payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::NoCipher | DecodeError::UnsupportedCipher(_) | DecodeError::NoPrivateKey => {
                ErrorKind::Precondition
            }
            DecodeError::NoMatchingReadingKey => ErrorKind::NotAuthorized,
            _ => ErrorKind::Corruption,
        }
    }

    /// True when the certificate is not a reader of the document.
    pub fn is_not_authorized(&self) -> bool {
        self.kind() == ErrorKind::NotAuthorized
    }
}
