//! Per-prime ring context
//!
//! A `SubRing` freezes everything one prime needs: Barrett and Montgomery
//! constants, bit-reversed root tables in Montgomery form, and the inverse
//! of the transform length. It is immutable after construction and safe to
//! share across threads by reference.

use crate::arith::modular::{
    gen_b_red_constant, gen_m_red_constant, inv_mod, m_form, m_red, pow_mod,
};
use crate::arith::primes::{check_primitive_root, is_prime, primitive_root};
use crate::arith::vec_ops;
use crate::errors::RingError;
use crate::ring::ntt;

/// Which transform the sub-ring carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NttKind {
    /// Nega-cyclic transform on `Z_q[X]/(X^N+1)`; `nth_root = 2N`.
    Standard,
    /// Transform on the conjugate-invariant sub-ring; `nth_root = 4N`.
    ConjugateInvariant,
}

impl NttKind {
    fn tag(self) -> u8 {
        match self {
            NttKind::Standard => 0,
            NttKind::ConjugateInvariant => 1,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, RingError> {
        match tag {
            0 => Ok(NttKind::Standard),
            1 => Ok(NttKind::ConjugateInvariant),
            _ => Err(RingError::InvalidEncoding("unknown NTT kind tag")),
        }
    }

    fn nth_root(self, n: usize) -> u64 {
        match self {
            NttKind::Standard => (n as u64) << 1,
            NttKind::ConjugateInvariant => (n as u64) << 2,
        }
    }
}

/// Reverses the lowest `bits` bits of `x`.
#[inline]
pub(crate) fn bit_reverse(x: usize, bits: u32) -> usize {
    x.reverse_bits() >> (usize::BITS - bits)
}

#[derive(Debug, Clone)]
pub struct SubRing {
    pub n: usize,
    pub modulus: u64,
    pub nth_root: u64,
    pub b_red_constant: [u64; 2],
    pub m_red_constant: u64,
    /// Powers of the primitive `nth_root`-th root, Montgomery form,
    /// bit-reversed order.
    pub roots_forward: Vec<u64>,
    pub roots_backward: Vec<u64>,
    /// `(nth_root/2)^{-1} mod q`, Montgomery form.
    pub n_inv: u64,
    pub ntt_kind: NttKind,
    /// Unique prime factors of `q-1`, kept for checked deserialization.
    pub factors: Vec<u64>,
    pub primitive_root: u64,
}

impl SubRing {
    /// Builds the context for one prime, deriving the primitive root.
    pub fn new(n: usize, modulus: u64, ntt_kind: NttKind) -> Result<Self, RingError> {
        Self::build(n, modulus, ntt_kind, None)
    }

    /// Builds the context with a caller-supplied primitive root and factor
    /// list, both of which are verified.
    pub fn new_with_primitive_root(
        n: usize,
        modulus: u64,
        ntt_kind: NttKind,
        root: u64,
        factors: Vec<u64>,
    ) -> Result<Self, RingError> {
        Self::build(n, modulus, ntt_kind, Some((root, factors)))
    }

    fn build(
        n: usize,
        modulus: u64,
        ntt_kind: NttKind,
        supplied: Option<(u64, Vec<u64>)>,
    ) -> Result<Self, RingError> {
        if !n.is_power_of_two() || n < 8 {
            return Err(RingError::InvalidRingDegree(n));
        }
        if modulus >= 1u64 << 61 {
            return Err(RingError::InvalidModulus {
                modulus,
                reason: "more than 61 bits",
            });
        }
        if modulus.is_power_of_two() {
            return Err(RingError::InvalidModulus {
                modulus,
                reason: "power of two",
            });
        }
        if !is_prime(modulus) {
            return Err(RingError::InvalidModulus {
                modulus,
                reason: "not prime",
            });
        }
        let nth_root = ntt_kind.nth_root(n);
        if (modulus - 1) % nth_root != 0 {
            return Err(RingError::InvalidModulus {
                modulus,
                reason: "not congruent to 1 mod the nth root",
            });
        }

        let b_red_constant = gen_b_red_constant(modulus);
        let m_red_constant = gen_m_red_constant(modulus);

        let (g, factors) = match supplied {
            Some((root, factors)) => {
                check_primitive_root(root, modulus, &factors)?;
                (root, factors)
            }
            None => primitive_root(modulus, None)?,
        };

        let psi = pow_mod(g, (modulus - 1) / nth_root, modulus);
        let psi_inv = inv_mod(psi, modulus);
        let psi_mont = m_form(psi, modulus, b_red_constant);
        let psi_inv_mont = m_form(psi_inv, modulus, b_red_constant);

        let table_len = (nth_root >> 1) as usize;
        let log_len = table_len.trailing_zeros();
        let mut roots_forward = vec![0u64; table_len];
        let mut roots_backward = vec![0u64; table_len];
        roots_forward[0] = m_form(1, modulus, b_red_constant);
        roots_backward[0] = roots_forward[0];
        for j in 1..table_len {
            let prev = bit_reverse(j - 1, log_len);
            let cur = bit_reverse(j, log_len);
            roots_forward[cur] = m_red(roots_forward[prev], psi_mont, modulus, m_red_constant);
            roots_backward[cur] =
                m_red(roots_backward[prev], psi_inv_mont, modulus, m_red_constant);
        }

        let n_inv = m_form(
            inv_mod((nth_root >> 1) % modulus, modulus),
            modulus,
            b_red_constant,
        );

        Ok(SubRing {
            n,
            modulus,
            nth_root,
            b_red_constant,
            m_red_constant,
            roots_forward,
            roots_backward,
            n_inv,
            ntt_kind,
            factors,
            primitive_root: g,
        })
    }

    /// Switches a scalar to the Montgomery domain of this prime.
    #[inline]
    pub fn m_form_scalar(&self, s: u64) -> u64 {
        m_form(s % self.modulus, self.modulus, self.b_red_constant)
    }

    // Coefficient kernels, forwarded with this prime's constants.

    pub fn add(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::add_vec(p1, p2, p3, self.modulus);
    }

    pub fn add_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::add_vec_lazy(p1, p2, p3);
    }

    pub fn sub(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::sub_vec(p1, p2, p3, self.modulus);
    }

    pub fn sub_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::sub_vec_lazy(p1, p2, p3, self.modulus);
    }

    pub fn neg(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::neg_vec(p1, p3, self.modulus);
    }

    pub fn reduce(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::reduce_vec(p1, p3, self.modulus, self.b_red_constant);
    }

    pub fn reduce_lazy(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::reduce_vec_lazy(p1, p3, self.modulus, self.b_red_constant);
    }

    pub fn mul_coeffs_barrett(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_barrett_vec(p1, p2, p3, self.modulus, self.b_red_constant);
    }

    pub fn mul_coeffs_barrett_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_barrett_lazy_vec(p1, p2, p3, self.modulus, self.b_red_constant);
    }

    pub fn mul_coeffs_montgomery(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_vec(p1, p2, p3, self.modulus, self.m_red_constant);
    }

    pub fn mul_coeffs_montgomery_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_lazy_vec(p1, p2, p3, self.modulus, self.m_red_constant);
    }

    pub fn mul_coeffs_montgomery_then_add(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_then_add_vec(p1, p2, p3, self.modulus, self.m_red_constant);
    }

    pub fn mul_coeffs_montgomery_then_add_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_then_add_lazy_vec(
            p1,
            p2,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    pub fn mul_coeffs_montgomery_then_sub(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_then_sub_vec(p1, p2, p3, self.modulus, self.m_red_constant);
    }

    pub fn mul_coeffs_montgomery_then_sub_lazy(&self, p1: &[u64], p2: &[u64], p3: &mut [u64]) {
        vec_ops::mul_coeffs_montgomery_then_sub_lazy_vec(
            p1,
            p2,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    pub fn m_form(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::m_form_vec(p1, p3, self.modulus, self.b_red_constant);
    }

    pub fn m_form_lazy(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::m_form_lazy_vec(p1, p3, self.modulus, self.b_red_constant);
    }

    pub fn i_m_form(&self, p1: &[u64], p3: &mut [u64]) {
        vec_ops::i_m_form_vec(p1, p3, self.modulus, self.m_red_constant);
    }

    pub fn add_scalar(&self, p1: &[u64], scalar: u64, p3: &mut [u64]) {
        vec_ops::add_scalar_vec(p1, scalar % self.modulus, p3, self.modulus);
    }

    pub fn add_scalar_lazy(&self, p1: &[u64], scalar: u64, p3: &mut [u64]) {
        vec_ops::add_scalar_lazy_vec(p1, scalar % self.modulus, p3);
    }

    pub fn sub_scalar(&self, p1: &[u64], scalar: u64, p3: &mut [u64]) {
        vec_ops::sub_scalar_vec(p1, scalar % self.modulus, p3, self.modulus);
    }

    /// `scalar_mont` must already be in Montgomery form.
    pub fn mul_scalar_montgomery(&self, p1: &[u64], scalar_mont: u64, p3: &mut [u64]) {
        vec_ops::mul_scalar_montgomery_vec(p1, scalar_mont, p3, self.modulus, self.m_red_constant);
    }

    pub fn mul_scalar_montgomery_lazy(&self, p1: &[u64], scalar_mont: u64, p3: &mut [u64]) {
        vec_ops::mul_scalar_montgomery_lazy_vec(
            p1,
            scalar_mont,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    pub fn mul_scalar_montgomery_then_add(&self, p1: &[u64], scalar_mont: u64, p3: &mut [u64]) {
        vec_ops::mul_scalar_montgomery_then_add_vec(
            p1,
            scalar_mont,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    pub fn mul_scalar_montgomery_then_add_scalar(
        &self,
        p1: &[u64],
        scalar_0: u64,
        scalar_mont_1: u64,
        p3: &mut [u64],
    ) {
        vec_ops::mul_scalar_montgomery_then_add_scalar_vec(
            p1,
            scalar_0 % self.modulus,
            scalar_mont_1,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    /// `(p1 + 2q - p2) * scalar mod q`; tolerates `p2` in `[0, 2q)`.
    pub fn sub_then_mul_scalar_montgomery_two_modulus(
        &self,
        p1: &[u64],
        p2: &[u64],
        scalar_mont: u64,
        p3: &mut [u64],
    ) {
        vec_ops::sub_then_mul_scalar_montgomery_two_modulus_vec(
            p1,
            p2,
            scalar_mont,
            p3,
            self.modulus,
            self.m_red_constant,
        );
    }

    // Transforms.

    pub fn ntt(&self, p1: &[u64], p2: &mut [u64]) {
        p2.copy_from_slice(p1);
        self.ntt_inplace(p2);
    }

    pub fn ntt_lazy(&self, p1: &[u64], p2: &mut [u64]) {
        p2.copy_from_slice(p1);
        self.ntt_lazy_inplace(p2);
    }

    pub fn intt(&self, p1: &[u64], p2: &mut [u64]) {
        p2.copy_from_slice(p1);
        self.intt_inplace(p2);
    }

    pub fn intt_lazy(&self, p1: &[u64], p2: &mut [u64]) {
        p2.copy_from_slice(p1);
        self.intt_lazy_inplace(p2);
    }

    pub fn ntt_inplace(&self, p: &mut [u64]) {
        match self.ntt_kind {
            NttKind::Standard => ntt::ntt_standard(
                p,
                self.modulus,
                self.m_red_constant,
                self.b_red_constant,
                &self.roots_forward,
            ),
            NttKind::ConjugateInvariant => ntt::ntt_conjugate_invariant(
                p,
                self.modulus,
                self.m_red_constant,
                self.b_red_constant,
                &self.roots_forward,
            ),
        }
    }

    pub fn ntt_lazy_inplace(&self, p: &mut [u64]) {
        match self.ntt_kind {
            NttKind::Standard => {
                ntt::ntt_standard_lazy(p, self.modulus, self.m_red_constant, &self.roots_forward)
            }
            NttKind::ConjugateInvariant => ntt::ntt_conjugate_invariant_lazy(
                p,
                self.modulus,
                self.m_red_constant,
                &self.roots_forward,
            ),
        }
    }

    pub fn intt_inplace(&self, p: &mut [u64]) {
        match self.ntt_kind {
            NttKind::Standard => ntt::intt_standard(
                p,
                self.modulus,
                self.m_red_constant,
                self.n_inv,
                &self.roots_backward,
            ),
            NttKind::ConjugateInvariant => ntt::intt_conjugate_invariant(
                p,
                self.modulus,
                self.m_red_constant,
                self.n_inv,
                &self.roots_backward,
            ),
        }
    }

    pub fn intt_lazy_inplace(&self, p: &mut [u64]) {
        match self.ntt_kind {
            NttKind::Standard => ntt::intt_standard_lazy(
                p,
                self.modulus,
                self.m_red_constant,
                self.n_inv,
                &self.roots_backward,
            ),
            NttKind::ConjugateInvariant => ntt::intt_conjugate_invariant_lazy(
                p,
                self.modulus,
                self.m_red_constant,
                self.n_inv,
                &self.roots_backward,
            ),
        }
    }

    // Serialization: fixed little-endian layout.

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.factors.len() * 8 + 8);
        out.push(self.ntt_kind.tag());
        out.push(self.n.trailing_zeros() as u8);
        out.push((self.nth_root / self.n as u64) as u8);
        out.extend_from_slice(&self.modulus.to_le_bytes());
        out.push(self.factors.len() as u8);
        for &f in self.factors.iter() {
            out.extend_from_slice(&f.to_le_bytes());
        }
        out.extend_from_slice(&self.primitive_root.to_le_bytes());
        out
    }

    /// Parses and re-validates a serialized record, returning the context
    /// and the number of bytes consumed.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), RingError> {
        if data.len() < 12 {
            return Err(RingError::InvalidEncoding("sub-ring header truncated"));
        }
        let kind = NttKind::from_tag(data[0])?;
        let log_n = data[1] as usize;
        if log_n >= usize::BITS as usize {
            return Err(RingError::InvalidEncoding("ring degree out of range"));
        }
        let n = 1usize << log_n;
        let ratio = data[2] as u64;
        if ratio != kind.nth_root(n) / n as u64 {
            return Err(RingError::InvalidEncoding("nth root ratio mismatch"));
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&data[3..11]);
        let modulus = u64::from_le_bytes(word);
        let f = data[11] as usize;
        let need = 12 + f * 8 + 8;
        if data.len() < need {
            return Err(RingError::InvalidEncoding("sub-ring body truncated"));
        }
        let mut factors = Vec::with_capacity(f);
        let mut off = 12;
        for _ in 0..f {
            word.copy_from_slice(&data[off..off + 8]);
            factors.push(u64::from_le_bytes(word));
            off += 8;
        }
        word.copy_from_slice(&data[off..off + 8]);
        let root = u64::from_le_bytes(word);
        let sub = Self::new_with_primitive_root(n, modulus, kind, root, factors)?;
        Ok((sub, need))
    }
}
