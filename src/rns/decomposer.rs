//! Gadget-digit decomposition
//!
//! Slices the Q chain into groups of `alpha` primes (one digit per group)
//! and base-extends each digit into the remaining Q residues and the full
//! P chain, reusing the ModUp accumulator. `alpha` is the length of the
//! P chain.

use std::sync::Arc;

use crate::arith::modular::{b_red_add, c_red};
use crate::ring::{Poly, Ring};
use crate::rns::{gen_mod_up_constants, mod_up_exact, ModUpConstants};

#[derive(Debug)]
struct DigitConstants {
    /// Group of `len` primes extended into the full Q chain.
    into_q: ModUpConstants,
    /// The same group extended into the full P chain.
    into_p: ModUpConstants,
}

#[derive(Debug)]
pub struct Decomposer<'a> {
    ring_q: &'a Ring,
    ring_p: &'a Ring,
    /// `constants[beta][len - 2]` covers the (possibly truncated) group of
    /// `len` primes starting at `beta * alpha`; single-prime groups are
    /// copied directly and need no constants.
    constants: Arc<Vec<Vec<DigitConstants>>>,
}

impl<'a> Decomposer<'a> {
    pub fn new(ring_q: &'a Ring, ring_p: &'a Ring) -> Self {
        let alpha = ring_p.active().len();
        let q_chain = ring_q.active();
        let p_chain = ring_p.active();

        let beta_count = q_chain.len().div_ceil(alpha);
        let mut constants = Vec::with_capacity(beta_count);
        for beta in 0..beta_count {
            let start = beta * alpha;
            let full = alpha.min(q_chain.len() - start);
            let mut per_len = Vec::new();
            for len in 2..=full {
                let group = &q_chain[start..start + len];
                per_len.push(DigitConstants {
                    into_q: gen_mod_up_constants(group, q_chain),
                    into_p: gen_mod_up_constants(group, p_chain),
                });
            }
            constants.push(per_len);
        }

        Decomposer {
            ring_q,
            ring_p,
            constants: Arc::new(constants),
        }
    }

    /// Number of digits at the given Q level.
    pub fn beta_count(&self, level_q: usize) -> usize {
        (level_q + 1).div_ceil(self.ring_p.active().len())
    }

    /// Extracts digit `beta` of `p_in` and extends it into the active Q and
    /// P bases. Output rows are reduced to `[0, q)`.
    pub fn decompose(
        &self,
        level_q: usize,
        level_p: usize,
        beta: usize,
        p_in: &Poly,
        p_out_q: &mut Poly,
        p_out_p: &mut Poly,
    ) {
        let alpha = self.ring_p.active().len();
        let q_chain = self.ring_q.active();
        let p_chain = self.ring_p.active();
        let start = beta * alpha;
        assert!(start <= level_q, "digit index out of range");
        let len = alpha.min(level_q + 1 - start);

        if len == 1 {
            // single-residue digit: reduce that residue into every output row
            let src = &p_in.coeffs[start];
            for (i, s) in q_chain[..=level_q].iter().enumerate() {
                for (dst, &v) in p_out_q.coeffs[i].iter_mut().zip(src.iter()) {
                    *dst = b_red_add(v, s.modulus, s.b_red_constant);
                }
            }
            for (j, t) in p_chain[..=level_p].iter().enumerate() {
                for (dst, &v) in p_out_p.coeffs[j].iter_mut().zip(src.iter()) {
                    *dst = b_red_add(v, t.modulus, t.b_red_constant);
                }
            }
            return;
        }

        // constants rows are aligned with the full target chains, so the
        // active prefixes index them directly
        let c = &self.constants[beta][len - 2];
        let group = &q_chain[start..start + len];
        let digit = &p_in.coeffs[start..start + len];

        mod_up_exact(
            digit,
            &mut p_out_q.coeffs[..=level_q],
            group,
            &q_chain[..=level_q],
            &c.into_q,
        );
        for (i, s) in q_chain[..=level_q].iter().enumerate() {
            for v in p_out_q.coeffs[i].iter_mut() {
                *v = c_red(*v, s.modulus);
            }
        }

        mod_up_exact(
            digit,
            &mut p_out_p.coeffs[..=level_p],
            group,
            &p_chain[..=level_p],
            &c.into_p,
        );
        for (j, t) in p_chain[..=level_p].iter().enumerate() {
            for v in p_out_p.coeffs[j].iter_mut() {
                *v = c_red(*v, t.modulus);
            }
        }
    }
}
