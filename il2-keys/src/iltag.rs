//! Explicit IL tags: `[ILInt tag id][ILInt payload length][payload]`.

use crate::error::{KeyError, Result};
use crate::ilint;

/// Tag id for a raw byte array (RSA modulus and exponent).
pub const RAW_BYTES_TAG_ID: u64 = 16;

/// Marker byte in front of a decrypted JSON document payload.
pub const JSON_PAYLOAD_MARKER: u8 = 0x11;

/// Tag id wrapping the RSA public key parameters.
pub const RSA_PARAMETERS_TAG_ID: u64 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub id: u64,
    pub payload: Vec<u8>,
}

impl RawTag {
    pub fn new(id: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        ilint::encoded_size(self.id)
            + ilint::encoded_size(self.payload.len() as u64)
            + self.payload.len()
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        ilint::encode(self.id, out);
        ilint::encode(self.payload.len() as u64, out);
        out.extend_from_slice(&self.payload);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Decode one tag from the start of `bytes`, returning it and the number
    /// of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize)> {
        let (id, id_len) = ilint::decode(bytes)?;
        let (len, len_len) = ilint::decode(&bytes[id_len..])?;
        let start = id_len + len_len;
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                KeyError::EncodingError(format!(
                    "IL tag {} declares {} payload bytes but only {} remain",
                    id,
                    len,
                    bytes.len() - start
                ))
            })?;
        Ok((Self::new(id, &bytes[start..end]), end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_id_length_and_payload() {
        let tag = RawTag::new(RAW_BYTES_TAG_ID, vec![0x01, 0x00, 0x01]);
        assert_eq!(tag.encode(), vec![0x10, 0x03, 0x01, 0x00, 0x01]);
        assert_eq!(tag.encoded_len(), 5);
    }

    #[test]
    fn nested_tags_decode_back() {
        let inner = [
            RawTag::new(RAW_BYTES_TAG_ID, vec![0xAB; 300]).encode(),
            RawTag::new(RAW_BYTES_TAG_ID, vec![0x01, 0x00, 0x01]).encode(),
        ]
        .concat();
        let outer = RawTag::new(RSA_PARAMETERS_TAG_ID, inner.clone()).encode();

        // 300 needs a two byte ILInt length
        assert_eq!(&outer[..1], &[0x28]);
        let (decoded, consumed) = RawTag::decode(&outer).unwrap();
        assert_eq!(consumed, outer.len());
        assert_eq!(decoded.id, RSA_PARAMETERS_TAG_ID);
        assert_eq!(decoded.payload, inner);

        let (modulus, used) = RawTag::decode(&decoded.payload).unwrap();
        assert_eq!(modulus.payload.len(), 300);
        assert_eq!(&decoded.payload[..3], &[0x10, 0xF8, 0x34]);
        let (exponent, _) = RawTag::decode(&decoded.payload[used..]).unwrap();
        assert_eq!(exponent.payload, vec![0x01, 0x00, 0x01]);
    }

    #[test]
    fn decode_rejects_short_payload() {
        assert!(RawTag::decode(&[0x10, 0x05, 0x01, 0x02]).is_err());
    }
}
