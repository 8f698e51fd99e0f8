//! CryptoNote varints: 7 data bits per byte, least significant group first,
//! 0x80 set on every byte except the last.

use crate::error::CryptoError;

/// Longest encoding of a u64
pub const MAX_VARINT_LEN: usize = 10;

pub fn encode(mut n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    while n >= 0x80 {
        out.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    out.push(n as u8);
    out
}

/// Decode one varint and return it together with the bytes that follow it
pub fn pop(bytes: &[u8]) -> Result<(u64, &[u8]), CryptoError> {
    let mut value = 0u64;

    for (pos, &byte) in bytes.iter().enumerate() {
        let group = (byte & 0x7f) as u64;
        let shift = 7 * pos as u32;

        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(CryptoError::ArithmeticOverflow);
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            // A zero final group after a continuation is a redundant byte
            if pos > 0 && byte == 0 {
                return Err(CryptoError::InvalidEncoding("non-canonical varint".into()));
            }
            return Ok((value, &bytes[pos + 1..]));
        }
    }

    Err(CryptoError::TruncatedInput)
}

/// Decode a varint at the start of `bytes`, ignoring anything after it
pub fn decode(bytes: &[u8]) -> Result<u64, CryptoError> {
    pop(bytes).map(|(value, _)| value)
}
