//! ILInt: the variable-length unsigned integer used by IL tags.
//!
//! Values below `0xF8` take a single byte. Larger values are written as a
//! header byte `0xF8 + (n - 1)` followed by `value - 0xF8` in `n` big-endian
//! bytes, `1 <= n <= 8`.

use crate::error::{KeyError, Result};

pub const ILINT_BASE: u8 = 0xF8;

const ILINT_BASE_U64: u64 = ILINT_BASE as u64;

/// Number of bytes `value` takes once encoded.
pub fn encoded_size(value: u64) -> usize {
    if value < ILINT_BASE_U64 {
        1
    } else {
        1 + payload_len(value - ILINT_BASE_U64)
    }
}

fn payload_len(offset: u64) -> usize {
    let significant_bits = 64 - offset.leading_zeros() as usize;
    significant_bits.div_ceil(8).max(1)
}

/// Append the encoding of `value` to `out`.
pub fn encode(value: u64, out: &mut Vec<u8>) {
    if value < ILINT_BASE_U64 {
        out.push(value as u8);
        return;
    }
    let offset = value - ILINT_BASE_U64;
    let n = payload_len(offset);
    out.push(ILINT_BASE + (n as u8 - 1));
    out.extend_from_slice(&offset.to_be_bytes()[8 - n..]);
}

pub fn encode_to_vec(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_size(value));
    encode(value, &mut out);
    out
}

/// Decode an ILInt from the start of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u64, usize)> {
    let header = *bytes
        .first()
        .ok_or_else(|| KeyError::EncodingError("ILInt: empty input".to_string()))?;
    if header < ILINT_BASE {
        return Ok((header as u64, 1));
    }

    let n = (header - ILINT_BASE) as usize + 1;
    let payload = bytes.get(1..1 + n).ok_or_else(|| {
        KeyError::EncodingError(format!(
            "ILInt: expected {} bytes after header, found {}",
            n,
            bytes.len() - 1
        ))
    })?;

    let offset = payload
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64);
    let value = offset
        .checked_add(ILINT_BASE_U64)
        .ok_or_else(|| KeyError::EncodingError("ILInt: value overflows u64".to_string()))?;

    Ok((value, 1 + n))
}
