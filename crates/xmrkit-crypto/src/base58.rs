//! Monero Base58 (block-based, NOT Bitcoin-compatible)
//!
//! Input is cut into 8-byte blocks, each read as a big-endian integer and
//! written as exactly 11 characters. A shorter final block uses the exact
//! width from `ENCODED_BLOCK_SIZES`, so output length depends only on input
//! length.

use crate::error::CryptoError;

pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub const FULL_BLOCK_SIZE: usize = 8;
pub const FULL_ENCODED_BLOCK_SIZE: usize = 11;

/// Encoded width for a block of 0..=8 bytes
const ENCODED_BLOCK_SIZES: [usize; FULL_BLOCK_SIZE + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

fn decoded_block_size(encoded_len: usize) -> Option<usize> {
    ENCODED_BLOCK_SIZES.iter().position(|&n| n == encoded_len)
}

fn alphabet_index(c: u8) -> Option<u64> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u64)
}

/// Number of characters produced for `len` input bytes
pub fn encoded_len(len: usize) -> usize {
    (len / FULL_BLOCK_SIZE) * FULL_ENCODED_BLOCK_SIZE + ENCODED_BLOCK_SIZES[len % FULL_BLOCK_SIZE]
}

fn encode_block(block: &[u8], out: &mut Vec<u8>) {
    let width = ENCODED_BLOCK_SIZES[block.len()];
    let mut num = block.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);

    // Slot is pre-filled with the zero digit, then written from the end
    let start = out.len();
    out.resize(start + width, ALPHABET[0]);
    let mut i = width;
    while num > 0 && i > 0 {
        i -= 1;
        out[start + i] = ALPHABET[(num % 58) as usize];
        num /= 58;
    }
}

pub fn encode(data: &[u8]) -> String {
    let mut out = Vec::with_capacity(encoded_len(data.len()));
    for chunk in data.chunks(FULL_BLOCK_SIZE) {
        encode_block(chunk, &mut out);
    }
    // Every byte comes from ALPHABET
    out.into_iter().map(char::from).collect()
}

fn decode_block(block: &[u8], out: &mut Vec<u8>) -> Result<(), CryptoError> {
    let size = decoded_block_size(block.len()).ok_or(CryptoError::InvalidLength {
        expected: FULL_ENCODED_BLOCK_SIZE,
        actual: block.len(),
    })?;

    let mut num = 0u64;
    let mut order = 1u64;
    for (i, &c) in block.iter().enumerate().rev() {
        let digit = alphabet_index(c).ok_or_else(|| {
            CryptoError::InvalidEncoding(format!("invalid base58 character '{}'", c as char))
        })?;

        let term = digit.checked_mul(order).ok_or(CryptoError::ArithmeticOverflow)?;
        num = num.checked_add(term).ok_or(CryptoError::ArithmeticOverflow)?;
        if i > 0 {
            order = order.checked_mul(58).ok_or(CryptoError::ArithmeticOverflow)?;
        }
    }

    if size < FULL_BLOCK_SIZE && num >> (8 * size) != 0 {
        return Err(CryptoError::ArithmeticOverflow);
    }

    out.extend_from_slice(&num.to_be_bytes()[FULL_BLOCK_SIZE - size..]);
    Ok(())
}

pub fn decode(input: &str) -> Result<Vec<u8>, CryptoError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / FULL_ENCODED_BLOCK_SIZE * FULL_BLOCK_SIZE + FULL_BLOCK_SIZE);
    for chunk in bytes.chunks(FULL_ENCODED_BLOCK_SIZE) {
        decode_block(chunk, &mut out)?;
    }
    Ok(out)
}
