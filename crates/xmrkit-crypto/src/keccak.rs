//! Keccak-256 with the original Keccak padding (0x01 ... 0x80)
//!
//! This is the hash CryptoNote calls `cn_fast_hash`. It is NOT NIST
//! SHA3-256, which pads with 0x06.

use crate::error::CryptoError;

/// Rate in bytes for a 256-bit capacity-512 sponge
pub const RATE: usize = 136;

const ROUNDS: usize = 24;

const ROUND_CONSTANTS: [u64; ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

// Rotation amounts and destination lanes, in the order the fused rho/pi
// step visits them starting from lane 1
const ROTATIONS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// Keccak-f[1600] over 25 little-endian lanes
pub fn keccak_f1600(state: &mut [u64; 25]) {
    let mut bc = [0u64; 5];

    for rc in ROUND_CONSTANTS.iter() {
        // Theta
        for i in 0..5 {
            bc[i] = state[i] ^ state[i + 5] ^ state[i + 10] ^ state[i + 15] ^ state[i + 20];
        }
        for i in 0..5 {
            let t = bc[(i + 4) % 5] ^ bc[(i + 1) % 5].rotate_left(1);
            for j in (0..25).step_by(5) {
                state[j + i] ^= t;
            }
        }

        // Rho and pi
        let mut t = state[1];
        for (&lane, &rot) in PI_LANES.iter().zip(ROTATIONS.iter()) {
            let next = state[lane];
            state[lane] = t.rotate_left(rot);
            t = next;
        }

        // Chi
        for j in (0..25).step_by(5) {
            bc.copy_from_slice(&state[j..j + 5]);
            for i in 0..5 {
                state[j + i] ^= !bc[(i + 1) % 5] & bc[(i + 2) % 5];
            }
        }

        // Iota
        state[0] ^= rc;
    }
}

/// Streaming Keccak-256 sponge.
///
/// `absorb` may be called any number of times until the first `squeeze`;
/// after that the sponge only produces output.
#[derive(Clone)]
pub struct Keccak256 {
    state: [u64; 25],
    buffer: [u8; RATE],
    buffered: usize,
    squeezing: bool,
    /// Bytes of the current output block already handed out
    squeezed: usize,
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Keccak256 {
    pub fn new() -> Self {
        Self {
            state: [0u64; 25],
            buffer: [0u8; RATE],
            buffered: 0,
            squeezing: false,
            squeezed: 0,
        }
    }

    fn absorb_block(&mut self) {
        for (lane, chunk) in self.state.iter_mut().zip(self.buffer.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *lane ^= u64::from_le_bytes(bytes);
        }
        keccak_f1600(&mut self.state);
        self.buffered = 0;
    }

    pub fn absorb(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        if self.squeezing {
            return Err(CryptoError::State("absorb after squeeze"));
        }
        self.absorb_unchecked(data);
        Ok(())
    }

    // Caller guarantees the sponge is still absorbing
    fn absorb_unchecked(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (RATE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered == RATE {
                self.absorb_block();
            }
        }
    }

    fn pad(&mut self) {
        self.buffer[self.buffered..].fill(0);
        self.buffer[self.buffered] ^= 0x01;
        self.buffer[RATE - 1] ^= 0x80;
        self.absorb_block();
        self.squeezing = true;
        self.squeezed = 0;
    }

    /// Fill `out` with the next output bytes, padding on the first call
    pub fn squeeze_into(&mut self, out: &mut [u8]) {
        if !self.squeezing {
            self.pad();
        }

        for byte in out.iter_mut() {
            if self.squeezed == RATE {
                keccak_f1600(&mut self.state);
                self.squeezed = 0;
            }
            let lane = self.state[self.squeezed / 8];
            *byte = (lane >> (8 * (self.squeezed % 8))) as u8;
            self.squeezed += 1;
        }
    }

    pub fn squeeze(&mut self, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.squeeze_into(&mut out);
        out
    }

    pub fn finalize(mut self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.squeeze_into(&mut out);
        out
    }
}

/// Keccak-256 (used by CryptoNote, NOT SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.absorb_unchecked(data);
    hasher.finalize()
}
