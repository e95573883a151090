//! Scalar and vector modular arithmetic

pub mod modular;
pub mod primes;
pub mod tables;
pub mod vec_ops;

#[cfg(test)]
mod vec_ops_tests;
