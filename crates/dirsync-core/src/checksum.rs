//! Checksum primitives for block matching.
//!
//! The weak checksum is the Adler-style rolling hash from the rsync
//! algorithm: two 16-bit running sums that slide over the input one byte at
//! a time in O(1). A 16-byte MD5 digest confirms candidate matches.

/// Modulus for both running sums.
const MOD: u32 = 1 << 16;

/// Rolling weak checksum over a fixed-length window.
///
/// `s1` is the plain byte sum, `s2` the position-weighted sum; both are kept
/// reduced mod 2^16 so `roll` stays wrap-safe for any window length.
pub struct RollingChecksum {
    s1: u32,
    s2: u32,
    window_len: u32,
}

impl RollingChecksum {
    /// Initialise over `block`, weighting positions for a window of
    /// `window_len` bytes. Runs in O(len).
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(block: &[u8], window_len: usize) -> Self {
        let len = window_len as u32;
        let mut s1 = 0u32;
        let mut s2 = 0u32;
        for (i, &byte) in block.iter().enumerate() {
            let weight = (len - i as u32) % MOD;
            s1 = (s1 + u32::from(byte)) % MOD;
            s2 = (s2 + weight * u32::from(byte)) % MOD;
        }
        Self {
            s1,
            s2,
            window_len: len,
        }
    }

    /// Current digest: `s2` in the upper 16 bits, `s1` in the lower.
    pub fn digest(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }

    /// Slide the window one byte forward: `out_byte` leaves at the front,
    /// `in_byte` enters at the back.
    ///
    /// Subtractions are rewritten as `+ MOD - x` so the arithmetic never
    /// underflows before the reduction.
    pub fn roll(&mut self, out_byte: u8, in_byte: u8) {
        let out = u32::from(out_byte);
        let inc = u32::from(in_byte);
        self.s1 = (self.s1 + MOD - out + inc) % MOD;
        let weighted_out = (self.window_len % MOD) * out % MOD;
        self.s2 = (self.s2 + MOD - weighted_out + self.s1) % MOD;
    }
}

/// 16-byte strong digest used to confirm weak-checksum candidates.
pub fn strong_digest(data: &[u8]) -> [u8; 16] {
    md5::compute(data).0
}
