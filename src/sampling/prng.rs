//! SHAKE256-based deterministic byte source
//!
//! A seeded XOF reader usable anywhere a `rand_core::RngCore` is expected;
//! the full-entropy alternative is `rand::rngs::OsRng`.

use rand_core::{CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;
use zeroize::Zeroize;

use crate::errors::RingError;

pub struct ShakePrng {
    reader: Box<dyn XofReader>,
}

impl ShakePrng {
    /// Deterministic stream from a seed; the caller keeps ownership of the
    /// seed bytes.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(seed);
        ShakePrng {
            reader: Box::new(hasher.finalize_xof()),
        }
    }

    /// Fresh stream keyed from the operating system entropy source.
    pub fn from_entropy() -> Result<Self, RingError> {
        let mut seed = [0u8; 32];
        rand::rngs::OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|_| RingError::SecureRandomFailure)?;
        let prng = Self::from_seed(&seed);
        seed.zeroize();
        Ok(prng)
    }
}

impl RngCore for ShakePrng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.reader.read(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.reader.read(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.reader.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.reader.read(dest);
        Ok(())
    }
}

impl CryptoRng for ShakePrng {}
