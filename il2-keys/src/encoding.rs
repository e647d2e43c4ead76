//! URL-safe Base64 as used in IL2 text representations.
//!
//! The node writes it without padding; decoding accepts both forms.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode_url(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

pub fn decode_url(text: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT.decode(text.trim())
}
