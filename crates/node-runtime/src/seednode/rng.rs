//! Deterministic key-generation randomness.

use rand::{CryptoRng, RngCore};
use shared_types::sha256;

use crate::seednode::SeedNodeError;

/// Reads the seed bytes in a cycle.
///
/// Used only to make a seednode's identity reproducible from a configured
/// phrase: the same seed always yields the same key and peer id.
pub struct SeedRandReader {
    seed: Vec<u8>,
    index: usize,
}

impl SeedRandReader {
    pub fn new(seed: Vec<u8>) -> Result<Self, SeedNodeError> {
        if seed.is_empty() {
            return Err(SeedNodeError::EmptySeed);
        }
        Ok(Self { seed, index: 0 })
    }

    /// Reader over `sha256(phrase)`.
    pub fn from_phrase(phrase: &str) -> Result<Self, SeedNodeError> {
        Self::new(sha256(phrase.as_bytes()).to_vec())
    }
}

impl RngCore for SeedRandReader {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.seed[self.index];
            self.index = (self.index + 1) % self.seed.len();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for SeedRandReader {}
