//! RNS basis switching
//!
//! Halevi-Polyakov-Shoup approximate base conversion between two prime
//! chains, and the gadget-digit decomposition built on the same kernel.

pub mod basis_extender;
pub mod decomposer;


pub use basis_extender::BasisExtender;
pub use decomposer::Decomposer;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::arith::modular::{c_red, inv_mod, m_form, m_red, mul_hi};
use crate::ring::subring::SubRing;

/// Precomputed constants for extending one prime chain into another.
#[derive(Debug, Clone)]
pub(crate) struct ModUpConstants {
    /// `((Q/q_i)^{-1} mod q_i)`, Montgomery form with respect to `q_i`.
    q_over_qi_inv_qi: Vec<u64>,
    /// `(Q/q_i) mod p_j`, Montgomery form with respect to `p_j`; `[j][i]`.
    q_over_qi_mod_p: Vec<Vec<u64>>,
    /// `(-k*Q) mod p_j` for `k` in `[0, a]`; `[j][k]`. Stored negated so the
    /// accumulator adds the correction directly.
    v_times_q_mod_p: Vec<Vec<u64>>,
    /// `1/q_i` as f64, for the floating-point correction count.
    q_inv_float: Vec<f64>,
}

pub(crate) fn gen_mod_up_constants(src: &[SubRing], dst: &[SubRing]) -> ModUpConstants {
    let a = src.len();
    let mut q_big = BigUint::from(1u64);
    for s in src {
        q_big *= s.modulus;
    }

    let q_over_qi: Vec<BigUint> = src.iter().map(|s| &q_big / s.modulus).collect();

    let q_over_qi_inv_qi = src
        .iter()
        .zip(q_over_qi.iter())
        .map(|(s, v)| {
            let rem = (v % s.modulus).to_u64().unwrap_or(0);
            m_form(inv_mod(rem, s.modulus), s.modulus, s.b_red_constant)
        })
        .collect();

    let mut q_over_qi_mod_p = Vec::with_capacity(dst.len());
    let mut v_times_q_mod_p = Vec::with_capacity(dst.len());
    for t in dst {
        let p = t.modulus;
        q_over_qi_mod_p.push(
            q_over_qi
                .iter()
                .map(|v| m_form((v % p).to_u64().unwrap_or(0), p, t.b_red_constant))
                .collect(),
        );
        let q_mod_p = (&q_big % p).to_u64().unwrap_or(0);
        let mut row = Vec::with_capacity(a + 1);
        let mut acc = 0u64;
        for _ in 0..=a {
            row.push(c_red(p - acc, p));
            acc = c_red(acc + q_mod_p, p);
        }
        v_times_q_mod_p.push(row);
    }

    ModUpConstants {
        q_over_qi_inv_qi,
        q_over_qi_mod_p,
        v_times_q_mod_p,
        q_inv_float: src.iter().map(|s| 1.0 / s.modulus as f64).collect(),
    }
}

/// Extends `p_in` (over `src`) into `p_out` (over `dst`), eight coefficient
/// columns at a time.
///
/// Each output coefficient is `sum_i y_i * (Q/q_i) - v*Q mod p_j`, with
/// `y_i = x_i * (Q/q_i)^{-1} mod q_i` and `v` the floor of the floating-point
/// sum of `y_i / q_i`. Outputs are lazy, in `[0, 2p_j)`.
pub(crate) fn mod_up_exact(
    p_in: &[Vec<u64>],
    p_out: &mut [Vec<u64>],
    src: &[SubRing],
    dst: &[SubRing],
    c: &ModUpConstants,
) {
    let a = src.len();
    let n = p_in[0].len();
    debug_assert_eq!(n % 8, 0);

    let mut y = vec![[0u64; 8]; a];
    let mut v = [0usize; 8];

    for x0 in (0..n).step_by(8) {
        let mut vf = [0f64; 8];
        for i in 0..a {
            let s = &src[i];
            let inv = c.q_over_qi_inv_qi[i];
            for k in 0..8 {
                let yi = m_red(p_in[i][x0 + k], inv, s.modulus, s.m_red_constant);
                y[i][k] = yi;
                vf[k] += yi as f64 * c.q_inv_float[i];
            }
        }
        for k in 0..8 {
            v[k] = vf[k] as usize;
        }
        for (j, t) in dst.iter().enumerate() {
            let p = t.modulus;
            let w = &c.q_over_qi_mod_p[j];
            let vq = &c.v_times_q_mod_p[j];
            let out = &mut p_out[j];
            for k in 0..8 {
                let mut acc: u128 = 0;
                for (yi, wi) in y.iter().zip(w.iter()) {
                    acc += yi[k] as u128 * *wi as u128;
                }
                let (hi, lo) = ((acc >> 64) as u64, acc as u64);
                let h = mul_hi(lo.wrapping_mul(t.m_red_constant), p);
                let r = hi.wrapping_sub(h).wrapping_add(p).wrapping_add(vq[v[k]]);
                // r exceeds 2p once the source chain passes eight primes
                out[x0 + k] = crate::arith::modular::b_red_add_lazy(r, p, t.b_red_constant);
            }
        }
    }
}
