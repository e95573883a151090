//! RNS-accelerated polynomial arithmetic for RLWE-based homomorphic
//! encryption
//!
//! Polynomials live in `Z_Q[X]/(X^N+1)` (or its conjugate-invariant
//! sub-ring) with `Q` split into machine-word primes; every polynomial is
//! stored as one residue row per prime. The [`ring::Ring`] type is the
//! public surface: it composes per-prime [`ring::SubRing`] contexts, the
//! NTT engine, the basis extenders, and the coefficient samplers.

pub mod arith;
pub mod errors;
pub mod ring;
pub mod rns;
pub mod sampling;

pub use errors::RingError;
pub use ring::{NttKind, Poly, Ring, SubRing};
pub use rns::{BasisExtender, Decomposer};
pub use sampling::{Distribution, Sampler, ShakePrng};
