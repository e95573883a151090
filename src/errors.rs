//! Library error surface
//!
//! Construction and generation paths return `RingError`; hot-path kernels
//! treat violated preconditions as caller bugs and abort.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// The modulus is not prime, is a power of two, or is not congruent
    /// to 1 modulo the required nth root of unity.
    #[error("invalid modulus {modulus}: {reason}")]
    InvalidModulus { modulus: u64, reason: &'static str },

    /// The ring degree is below the minimum or not a power of two.
    #[error("invalid ring degree {0}: must be a power of two >= 8")]
    InvalidRingDegree(usize),

    /// The supplied primitive root is not a generator of (Z/qZ)*.
    #[error("{root} is not a primitive root modulo {modulus}")]
    InvalidPrimitiveRoot { root: u64, modulus: u64 },

    /// A supplied factor of q-1 is composite.
    #[error("composite factor {0} in factor list")]
    CompositeFactor(u64),

    /// The supplied factor list does not cover every prime factor of q-1.
    #[error("incomplete factor list for {0}")]
    IncompleteFactorList(u64),

    /// The prime search space was exhausted before `n` primes were found.
    #[error("cannot generate {wanted} NTT primes with log2(q) = {log_q} and nth root {nth_root}")]
    CannotGenerateEnoughPrimes {
        log_q: usize,
        nth_root: u64,
        wanted: usize,
    },

    /// The upward prime walker crossed the 61-bit ceiling.
    #[error("next NTT prime after {0} exceeds 61 bits")]
    NextNttPrimeExceeds61Bits(u64),

    /// The downward prime walker fell below the nth root.
    #[error("previous NTT prime before {0} is below the nth root")]
    PreviousNttPrimeBelowRoot(u64),

    /// A full-entropy byte source failed to deliver.
    #[error("secure random source failure")]
    SecureRandomFailure,

    /// A serialized record is malformed or truncated.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),
}
