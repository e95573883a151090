//! Basis extension between the chains Q and P
//!
//! The extender owns two scratch polynomials and shares its precomputed
//! tables; `shallow_copy` hands a fork-join worker its own scratch over the
//! same tables.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::arith::modular::{inv_mod, m_form};
use crate::ring::{Poly, Ring};
use crate::rns::{gen_mod_up_constants, mod_up_exact, ModUpConstants};

#[derive(Debug)]
struct ExtenderTables {
    /// Constants for `q[0..=l]` into the full P chain, indexed by `l`.
    q_to_p: Vec<ModUpConstants>,
    /// Constants for `p[0..=l]` into the full Q chain, indexed by `l`.
    p_to_q: Vec<ModUpConstants>,
    /// `(prod_{j<=l} p_j)^{-1} mod q_i` in Montgomery form; `[l][i]`.
    p_inv_mod_q: Vec<Vec<u64>>,
}

#[derive(Debug)]
pub struct BasisExtender<'a> {
    ring_q: &'a Ring,
    ring_p: &'a Ring,
    tables: Arc<ExtenderTables>,
    buff_q: Poly,
    buff_p: Poly,
}

impl<'a> BasisExtender<'a> {
    pub fn new(ring_q: &'a Ring, ring_p: &'a Ring) -> Self {
        let q_chain = &ring_q.active()[..];
        let p_chain = &ring_p.active()[..];

        let q_to_p = (0..q_chain.len())
            .map(|l| gen_mod_up_constants(&q_chain[..=l], p_chain))
            .collect();
        let p_to_q = (0..p_chain.len())
            .map(|l| gen_mod_up_constants(&p_chain[..=l], q_chain))
            .collect();

        let mut p_inv_mod_q = Vec::with_capacity(p_chain.len());
        let mut p_big = BigUint::from(1u64);
        for p in p_chain {
            p_big *= p.modulus;
            p_inv_mod_q.push(
                q_chain
                    .iter()
                    .map(|s| {
                        let rem = (&p_big % s.modulus).to_u64().unwrap_or(0);
                        m_form(inv_mod(rem, s.modulus), s.modulus, s.b_red_constant)
                    })
                    .collect(),
            );
        }

        BasisExtender {
            ring_q,
            ring_p,
            tables: Arc::new(ExtenderTables {
                q_to_p,
                p_to_q,
                p_inv_mod_q,
            }),
            buff_q: ring_q.new_poly(),
            buff_p: ring_p.new_poly(),
        }
    }

    /// A sibling extender sharing the precomputed tables but owning fresh
    /// scratch, for use from another thread.
    pub fn shallow_copy(&self) -> BasisExtender<'a> {
        BasisExtender {
            ring_q: self.ring_q,
            ring_p: self.ring_p,
            tables: Arc::clone(&self.tables),
            buff_q: self.ring_q.new_poly(),
            buff_p: self.ring_p.new_poly(),
        }
    }

    /// Extends `p_q` modulo `q_0..q_levelQ` into `p_p` modulo
    /// `p_0..p_levelP`; output rows are reduced to `[0, p_j)`.
    pub fn mod_up_q_to_p(&mut self, level_q: usize, level_p: usize, p_q: &Poly, p_p: &mut Poly) {
        let src = &self.ring_q.active()[..=level_q];
        let dst = &self.ring_p.active()[..=level_p];
        mod_up_exact(
            &p_q.coeffs[..=level_q],
            &mut p_p.coeffs[..=level_p],
            src,
            dst,
            &self.tables.q_to_p[level_q],
        );
        for (j, t) in dst.iter().enumerate() {
            let row = &mut p_p.coeffs[j];
            for c in row.iter_mut() {
                *c = crate::arith::modular::c_red(*c, t.modulus);
            }
        }
    }

    /// Extends `p_p` modulo `p_0..p_levelP` into `p_q` modulo
    /// `q_0..q_levelQ`; output rows are reduced to `[0, q_i)`.
    pub fn mod_up_p_to_q(&mut self, level_p: usize, level_q: usize, p_p: &Poly, p_q: &mut Poly) {
        let src = &self.ring_p.active()[..=level_p];
        let dst = &self.ring_q.active()[..=level_q];
        mod_up_exact(
            &p_p.coeffs[..=level_p],
            &mut p_q.coeffs[..=level_q],
            src,
            dst,
            &self.tables.p_to_q[level_p],
        );
        for (i, s) in dst.iter().enumerate() {
            let row = &mut p_q.coeffs[i];
            for c in row.iter_mut() {
                *c = crate::arith::modular::c_red(*c, s.modulus);
            }
        }
    }

    /// `p2_q = (p1_q - p1_p) / P mod Q` for coefficient-domain inputs: the
    /// P part is extended into Q, subtracted, and the result scaled by
    /// `P^{-1}`.
    pub fn mod_down_q_p_to_q(
        &mut self,
        level_q: usize,
        level_p: usize,
        p1_q: &Poly,
        p1_p: &Poly,
        p2_q: &mut Poly,
    ) {
        let src = &self.ring_p.active()[..=level_p];
        let dst = &self.ring_q.active()[..=level_q];
        mod_up_exact(
            &p1_p.coeffs[..=level_p],
            &mut self.buff_q.coeffs[..=level_q],
            src,
            dst,
            &self.tables.p_to_q[level_p],
        );
        for (i, s) in dst.iter().enumerate() {
            s.sub_then_mul_scalar_montgomery_two_modulus(
                &p1_q.coeffs[i],
                &self.buff_q.coeffs[i],
                self.tables.p_inv_mod_q[level_p][i],
                &mut p2_q.coeffs[i],
            );
        }
    }

    /// NTT-domain variant of [`Self::mod_down_q_p_to_q`]: the P part leaves
    /// the NTT domain for the extension and the buffer re-enters it before
    /// the subtraction.
    pub fn mod_down_q_p_to_q_ntt(
        &mut self,
        level_q: usize,
        level_p: usize,
        p1_q: &Poly,
        p1_p: &Poly,
        p2_q: &mut Poly,
    ) {
        for (j, t) in self.ring_p.active()[..=level_p].iter().enumerate() {
            t.intt_lazy(&p1_p.coeffs[j], &mut self.buff_p.coeffs[j]);
        }
        let src = &self.ring_p.active()[..=level_p];
        let dst = &self.ring_q.active()[..=level_q];
        mod_up_exact(
            &self.buff_p.coeffs[..=level_p],
            &mut self.buff_q.coeffs[..=level_q],
            src,
            dst,
            &self.tables.p_to_q[level_p],
        );
        for (i, s) in dst.iter().enumerate() {
            s.ntt_lazy_inplace(&mut self.buff_q.coeffs[i]);
            s.sub_then_mul_scalar_montgomery_two_modulus(
                &p1_q.coeffs[i],
                &self.buff_q.coeffs[i],
                self.tables.p_inv_mod_q[level_p][i],
                &mut p2_q.coeffs[i],
            );
        }
    }
}
