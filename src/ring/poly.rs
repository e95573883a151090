//! RNS polynomial storage
//!
//! A `Poly` is an ordered set of residue rows, one per prime, each holding
//! exactly `N` coefficients. It carries no modulus context; the owning
//! `Ring` supplies it.

use crate::errors::RingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    pub coeffs: Vec<Vec<u64>>,
}

impl Poly {
    /// Zero polynomial with `level + 1` residue rows of `n` coefficients.
    pub fn new(n: usize, level: usize) -> Self {
        Poly {
            coeffs: vec![vec![0u64; n]; level + 1],
        }
    }

    /// Number of coefficients per residue row.
    pub fn n(&self) -> usize {
        self.coeffs[0].len()
    }

    /// Index of the last residue row.
    pub fn level(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Sets every coefficient of every row to zero.
    pub fn zero(&mut self) {
        for row in self.coeffs.iter_mut() {
            for c in row.iter_mut() {
                *c = 0;
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|row| row.iter().all(|&c| c == 0))
    }

    /// Copies the rows both polynomials have in common.
    pub fn copy_from(&mut self, other: &Poly) {
        for (dst, src) in self.coeffs.iter_mut().zip(other.coeffs.iter()) {
            dst.copy_from_slice(src);
        }
    }

    /// Grows or shrinks to `level + 1` rows; new rows are zero.
    pub fn resize(&mut self, level: usize) {
        let n = self.n();
        self.coeffs.resize_with(level + 1, || vec![0u64; n]);
    }

    /// Compares the first `level + 1` rows.
    pub fn equal_lvl(&self, level: usize, other: &Poly) -> bool {
        self.coeffs[..=level] == other.coeffs[..=level]
    }

    /// Serializes as big-endian row count, big-endian `N`, then row-major
    /// little-endian coefficients.
    pub fn to_bytes(&self) -> Vec<u8> {
        let k = self.coeffs.len() as u32;
        let n = self.n() as u32;
        let mut out = Vec::with_capacity(8 + self.coeffs.len() * self.n() * 8);
        out.extend_from_slice(&k.to_be_bytes());
        out.extend_from_slice(&n.to_be_bytes());
        for row in self.coeffs.iter() {
            for &c in row.iter() {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, RingError> {
        if data.len() < 8 {
            return Err(RingError::InvalidEncoding("polynomial header truncated"));
        }
        let k = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let n = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
        if k == 0 || n == 0 {
            return Err(RingError::InvalidEncoding("empty polynomial"));
        }
        if data.len() < 8 + k * n * 8 {
            return Err(RingError::InvalidEncoding("polynomial body truncated"));
        }
        let mut coeffs = Vec::with_capacity(k);
        let mut off = 8;
        for _ in 0..k {
            let mut row = Vec::with_capacity(n);
            for _ in 0..n {
                let mut word = [0u8; 8];
                word.copy_from_slice(&data[off..off + 8]);
                row.push(u64::from_le_bytes(word));
                off += 8;
            }
            coeffs.push(row);
        }
        Ok(Poly { coeffs })
    }
}
