//! Level-aware RNS ring
//!
//! A `Ring` owns one `SubRing` per prime and a level cursor selecting the
//! active residue prefix. Every polynomial operation iterates the active
//! primes and delegates to the per-prime kernels. The ring itself is
//! immutable; `at_level` derives a cursor-fixed view instead of mutating.

pub mod ntt;
pub mod poly;
pub mod subring;

#[cfg(test)]
mod ntt_tests;
#[cfg(test)]
mod subring_tests;

use std::sync::Arc;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use crate::arith::modular::{c_red, inv_mod};
use crate::errors::RingError;

pub use poly::Poly;
pub use subring::{NttKind, SubRing};

#[derive(Debug, Clone)]
pub struct Ring {
    sub_rings: Arc<Vec<SubRing>>,
    level: usize,
    /// `modulus_big[l]` is the product of the first `l+1` primes.
    modulus_big: Arc<Vec<BigUint>>,
}

impl Ring {
    /// Standard nega-cyclic ring of degree `n` over the given primes.
    pub fn new(n: usize, moduli: &[u64]) -> Result<Self, RingError> {
        Self::new_with_kind(n, moduli, NttKind::Standard)
    }

    /// Conjugate-invariant ring of degree `n` over the given primes.
    pub fn new_conjugate_invariant(n: usize, moduli: &[u64]) -> Result<Self, RingError> {
        Self::new_with_kind(n, moduli, NttKind::ConjugateInvariant)
    }

    pub fn new_with_kind(n: usize, moduli: &[u64], kind: NttKind) -> Result<Self, RingError> {
        let mut sub_rings = Vec::with_capacity(moduli.len());
        for &q in moduli {
            sub_rings.push(SubRing::new(n, q, kind)?);
        }
        Self::from_subrings(sub_rings)
    }

    /// Composes prebuilt sub-rings; they must agree on degree and kind.
    pub fn from_subrings(sub_rings: Vec<SubRing>) -> Result<Self, RingError> {
        let first = sub_rings.first().ok_or(RingError::InvalidRingDegree(0))?;
        let (n, kind) = (first.n, first.ntt_kind);
        for s in sub_rings.iter() {
            if s.n != n || s.ntt_kind != kind {
                return Err(RingError::InvalidRingDegree(s.n));
            }
        }
        let mut modulus_big = Vec::with_capacity(sub_rings.len());
        let mut acc = BigUint::from(1u64);
        for s in sub_rings.iter() {
            acc *= BigUint::from(s.modulus);
            modulus_big.push(acc.clone());
        }
        let level = sub_rings.len() - 1;
        Ok(Ring {
            sub_rings: Arc::new(sub_rings),
            level,
            modulus_big: Arc::new(modulus_big),
        })
    }

    /// A view of this ring restricted to the first `level + 1` primes.
    pub fn at_level(&self, level: usize) -> Ring {
        assert!(level <= self.max_level(), "level out of range");
        Ring {
            sub_rings: Arc::clone(&self.sub_rings),
            level,
            modulus_big: Arc::clone(&self.modulus_big),
        }
    }

    pub fn n(&self) -> usize {
        self.sub_rings[0].n
    }

    pub fn log2_n(&self) -> usize {
        self.n().trailing_zeros() as usize
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.sub_rings.len() - 1
    }

    pub fn ntt_kind(&self) -> NttKind {
        self.sub_rings[0].ntt_kind
    }

    pub fn sub_ring(&self, i: usize) -> &SubRing {
        &self.sub_rings[i]
    }

    /// Active sub-rings, lowest prime first.
    pub fn active(&self) -> &[SubRing] {
        &self.sub_rings[..=self.level]
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.sub_rings.iter().map(|s| s.modulus).collect()
    }

    /// Product of the active primes.
    pub fn modulus_big(&self) -> &BigUint {
        &self.modulus_big[self.level]
    }

    pub fn modulus_big_at(&self, level: usize) -> &BigUint {
        &self.modulus_big[level]
    }

    pub fn total_modulus_bits(&self) -> u64 {
        self.modulus_big().bits()
    }

    pub fn new_poly(&self) -> Poly {
        Poly::new(self.n(), self.level)
    }

    pub fn new_poly_lvl(&self, level: usize) -> Poly {
        Poly::new(self.n(), level)
    }

    // Level-aware forwarding of the coefficient kernels.

    pub fn add(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.add(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn add_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.add_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn sub(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.sub(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn sub_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.sub_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn neg(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.neg(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn reduce(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.reduce(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn reduce_lazy(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.reduce_lazy(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_barrett(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_barrett(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_barrett_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_barrett_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery_then_add(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery_then_add(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery_then_add_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery_then_add_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery_then_sub(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery_then_sub(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn mul_coeffs_montgomery_then_sub_lazy(&self, p1: &Poly, p2: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.mul_coeffs_montgomery_then_sub_lazy(&p1.coeffs[i], &p2.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn m_form(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.m_form(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn m_form_lazy(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.m_form_lazy(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn i_m_form(&self, p1: &Poly, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.i_m_form(&p1.coeffs[i], &mut p3.coeffs[i]);
        }
    }

    pub fn add_scalar(&self, p1: &Poly, scalar: u64, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.add_scalar(&p1.coeffs[i], scalar, &mut p3.coeffs[i]);
        }
    }

    pub fn add_scalar_lazy(&self, p1: &Poly, scalar: u64, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.add_scalar_lazy(&p1.coeffs[i], scalar, &mut p3.coeffs[i]);
        }
    }

    pub fn sub_scalar(&self, p1: &Poly, scalar: u64, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.sub_scalar(&p1.coeffs[i], scalar, &mut p3.coeffs[i]);
        }
    }

    /// Multiplies by a plain scalar, converting it to Montgomery form once
    /// per prime.
    pub fn mul_scalar(&self, p1: &Poly, scalar: u64, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            let sm = s.m_form_scalar(scalar);
            s.mul_scalar_montgomery(&p1.coeffs[i], sm, &mut p3.coeffs[i]);
        }
    }

    pub fn mul_scalar_then_add(&self, p1: &Poly, scalar: u64, p3: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            let sm = s.m_form_scalar(scalar);
            s.mul_scalar_montgomery_then_add(&p1.coeffs[i], sm, &mut p3.coeffs[i]);
        }
    }

    pub fn mul_scalar_then_add_scalar(
        &self,
        p1: &Poly,
        scalar_0: u64,
        scalar_1: u64,
        p3: &mut Poly,
    ) {
        for (i, s) in self.active().iter().enumerate() {
            let sm = s.m_form_scalar(scalar_1);
            s.mul_scalar_montgomery_then_add_scalar(&p1.coeffs[i], scalar_0, sm, &mut p3.coeffs[i]);
        }
    }

    /// `p3 = (p1 >> shift) & mask` on every active residue row.
    pub fn mask(&self, p1: &Poly, shift: usize, mask: u64, p3: &mut Poly) {
        for i in 0..=self.level {
            crate::arith::vec_ops::mask_vec(&p1.coeffs[i], shift, mask, &mut p3.coeffs[i]);
        }
    }

    // Transforms.

    pub fn ntt(&self, p1: &Poly, p2: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.ntt(&p1.coeffs[i], &mut p2.coeffs[i]);
        }
    }

    pub fn ntt_lazy(&self, p1: &Poly, p2: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.ntt_lazy(&p1.coeffs[i], &mut p2.coeffs[i]);
        }
    }

    pub fn intt(&self, p1: &Poly, p2: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.intt(&p1.coeffs[i], &mut p2.coeffs[i]);
        }
    }

    pub fn intt_lazy(&self, p1: &Poly, p2: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.intt_lazy(&p1.coeffs[i], &mut p2.coeffs[i]);
        }
    }

    pub fn ntt_inplace(&self, p: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.ntt_inplace(&mut p.coeffs[i]);
        }
    }

    pub fn ntt_lazy_inplace(&self, p: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.ntt_lazy_inplace(&mut p.coeffs[i]);
        }
    }

    pub fn intt_inplace(&self, p: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.intt_inplace(&mut p.coeffs[i]);
        }
    }

    pub fn intt_lazy_inplace(&self, p: &mut Poly) {
        for (i, s) in self.active().iter().enumerate() {
            s.intt_lazy_inplace(&mut p.coeffs[i]);
        }
    }

    // Coefficient entry and CRT reconstruction.

    /// Maps unsigned values into RNS by reduction against each active prime.
    pub fn set_coefficients_u64(&self, values: &[u64], p: &mut Poly) {
        assert_eq!(values.len(), self.n(), "coefficient count mismatch");
        for (i, s) in self.active().iter().enumerate() {
            let brc = s.b_red_constant;
            let q = s.modulus;
            for (c, &v) in p.coeffs[i].iter_mut().zip(values.iter()) {
                *c = crate::arith::modular::b_red_add(v, q, brc);
            }
        }
    }

    /// Maps signed values into RNS; negatives land on `q - |v| mod q`.
    pub fn set_coefficients_i64(&self, values: &[i64], p: &mut Poly) {
        assert_eq!(values.len(), self.n(), "coefficient count mismatch");
        for (i, s) in self.active().iter().enumerate() {
            let q = s.modulus;
            for (c, &v) in p.coeffs[i].iter_mut().zip(values.iter()) {
                let abs = v.unsigned_abs() % q;
                *c = if v < 0 { c_red(q - abs, q) } else { abs };
            }
        }
    }

    /// Parses decimal strings (optionally signed) into RNS coefficients.
    pub fn set_coefficients_string(&self, values: &[&str], p: &mut Poly) -> Result<(), RingError> {
        assert_eq!(values.len(), self.n(), "coefficient count mismatch");
        let q_big = BigInt::from_biguint(Sign::Plus, self.modulus_big().clone());
        let mut big = Vec::with_capacity(values.len());
        for v in values {
            let parsed: BigInt = v
                .parse()
                .map_err(|_| RingError::InvalidEncoding("malformed decimal coefficient"))?;
            let reduced = ((parsed % &q_big) + &q_big) % &q_big;
            big.push(reduced.to_biguint().unwrap_or_default());
        }
        self.set_coefficients_bigint(&big, p);
        Ok(())
    }

    /// Maps big integers into RNS by reduction against each active prime.
    pub fn set_coefficients_bigint(&self, values: &[BigUint], p: &mut Poly) {
        assert_eq!(values.len(), self.n(), "coefficient count mismatch");
        for (i, s) in self.active().iter().enumerate() {
            let q = BigUint::from(s.modulus);
            for (c, v) in p.coeffs[i].iter_mut().zip(values.iter()) {
                *c = (v % &q).to_u64().unwrap_or(0);
            }
        }
    }

    /// CRT reconstruction of every coefficient over the active primes.
    ///
    /// The CRT weights `(Q/q_i) * ((Q/q_i)^{-1} mod q_i)` are recomputed per
    /// call and shared across the coefficient columns.
    pub fn poly_to_bigint(&self, p: &Poly) -> Vec<BigUint> {
        let q_big = self.modulus_big().clone();
        let weights: Vec<BigUint> = self
            .active()
            .iter()
            .map(|s| {
                let q_over_qi = &q_big / s.modulus;
                let rem = (&q_over_qi % s.modulus).to_u64().unwrap_or(0);
                &q_over_qi * inv_mod(rem, s.modulus)
            })
            .collect();

        (0..self.n())
            .map(|j| {
                let mut acc = BigUint::zero();
                for (i, w) in weights.iter().enumerate() {
                    acc += w * p.coeffs[i][j];
                }
                acc % &q_big
            })
            .collect()
    }

    /// Multiplies by the monomial `X^k`; coefficients crossing the degree-N
    /// boundary flip sign because `X^N = -1`.
    pub fn mult_by_monomial(&self, p1: &Poly, k: i64, p2: &mut Poly) {
        let n = self.n();
        let two_n = (2 * n) as i64;
        let shift = k.rem_euclid(two_n) as usize;
        for (i, s) in self.active().iter().enumerate() {
            let q = s.modulus;
            let (src, dst) = (&p1.coeffs[i], &mut p2.coeffs[i]);
            for j in 0..n {
                let idx = j + shift;
                if idx < n {
                    dst[idx] = src[j];
                } else if idx < 2 * n {
                    dst[idx - n] = c_red(q - src[j], q);
                } else {
                    dst[idx - 2 * n] = src[j];
                }
            }
        }
    }

    /// Cyclic left-rotation of every residue row by `k` slots.
    pub fn shift(&self, p1: &Poly, k: usize, p2: &mut Poly) {
        let n = self.n();
        let k = k % n;
        for i in 0..=self.level {
            p2.coeffs[i].copy_from_slice(&p1.coeffs[i]);
            p2.coeffs[i].rotate_left(k);
        }
    }

    /// Evaluates `sum_i pol[i] * scalar^i` by Horner's rule.
    pub fn eval_poly_scalar(&self, pol: &[Poly], scalar: u64, p3: &mut Poly) {
        assert!(!pol.is_empty(), "empty polynomial vector");
        let scalar_mont: Vec<u64> = self.active().iter().map(|s| s.m_form_scalar(scalar)).collect();
        let mut tmp = self.new_poly();
        p3.copy_from(&pol[pol.len() - 1]);
        for coeffs in pol[..pol.len() - 1].iter().rev() {
            for (i, s) in self.active().iter().enumerate() {
                s.mul_scalar_montgomery(&p3.coeffs[i], scalar_mont[i], &mut tmp.coeffs[i]);
                s.add(&tmp.coeffs[i], &coeffs.coeffs[i], &mut p3.coeffs[i]);
            }
        }
    }

    // Serialization: 1-byte sub-ring count followed by the sub-ring records.

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.sub_rings.len() as u8];
        for s in self.sub_rings.iter() {
            out.extend_from_slice(&s.to_bytes());
        }
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, RingError> {
        let count = *data
            .first()
            .ok_or(RingError::InvalidEncoding("ring header truncated"))? as usize;
        let mut sub_rings = Vec::with_capacity(count);
        let mut off = 1;
        for _ in 0..count {
            let (s, used) = SubRing::from_bytes(&data[off..])?;
            sub_rings.push(s);
            off += used;
        }
        Self::from_subrings(sub_rings)
    }
}
