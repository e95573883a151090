//! Fused per-coefficient kernels over blocks of eight
//!
//! Every kernel advances eight coefficients per iteration; slice lengths
//! must be a multiple of eight. Output ranges are part of each kernel's
//! contract: exact kernels end in `[0, q)`, lazy kernels in the annotated
//! wider range, so callers can elide redundant reductions.

use crate::arith::modular::{
    b_red, b_red_add, b_red_add_lazy, b_red_lazy, c_red, i_m_form, m_form, m_form_lazy, m_red,
    m_red_lazy,
};

#[inline(always)]
fn check_unary(p1: &[u64], p3: &[u64]) {
    assert_eq!(p1.len(), p3.len(), "operand length mismatch");
    assert_eq!(p1.len() % 8, 0, "slice length must be a multiple of 8");
}

#[inline(always)]
fn check_binary(p1: &[u64], p2: &[u64], p3: &[u64]) {
    assert_eq!(p1.len(), p2.len(), "operand length mismatch");
    check_unary(p1, p3);
}

macro_rules! for_each_block {
    // p3[k] = f(p1[k], p2[k])
    ($p1:ident, $p2:ident, $p3:ident, |$a:ident, $b:ident| $body:expr) => {
        for ((z, x), y) in $p3
            .chunks_exact_mut(8)
            .zip($p1.chunks_exact(8))
            .zip($p2.chunks_exact(8))
        {
            for k in 0..8 {
                let $a = x[k];
                let $b = y[k];
                z[k] = $body;
            }
        }
    };
    // p3[k] = f(p1[k])
    ($p1:ident, $p3:ident, |$a:ident| $body:expr) => {
        for (z, x) in $p3.chunks_exact_mut(8).zip($p1.chunks_exact(8)) {
            for k in 0..8 {
                let $a = x[k];
                z[k] = $body;
            }
        }
    };
    // p3[k] = f(p1[k], p2[k], p3[k])  (accumulating)
    (acc $p1:ident, $p2:ident, $p3:ident, |$a:ident, $b:ident, $c:ident| $body:expr) => {
        for ((z, x), y) in $p3
            .chunks_exact_mut(8)
            .zip($p1.chunks_exact(8))
            .zip($p2.chunks_exact(8))
        {
            for k in 0..8 {
                let $a = x[k];
                let $b = y[k];
                let $c = z[k];
                z[k] = $body;
            }
        }
    };
}

/// `p3 = p1 + p2 mod q`; output in `[0, q)`.
pub fn add_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| c_red(a + b, q));
}

/// `p3 = p1 + p2`; output in `[0, 2q)`.
pub fn add_vec_lazy(p1: &[u64], p2: &[u64], p3: &mut [u64]) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| a + b);
}

/// `p3 = p1 - p2 mod q`, computed as `(p1 + q - p2) mod q`; output in `[0, q)`.
pub fn sub_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| c_red(a + q - b, q));
}

/// `p3 = p1 + q - p2`; output in `[0, 2q)`.
pub fn sub_vec_lazy(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| a + q - b);
}

/// `p3 = q - p1`; output in `[0, q]`.
pub fn neg_vec(p1: &[u64], p3: &mut [u64], q: u64) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| q - a);
}

/// Per-coefficient Barrett reduction; output in `[0, q)`.
pub fn reduce_vec(p1: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| b_red_add(a, q, brc));
}

/// Lazy per-coefficient Barrett reduction; output in `[0, 2q)`.
pub fn reduce_vec_lazy(p1: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| b_red_add_lazy(a, q, brc));
}

/// `p3 = p1 * p2 mod q` via Barrett; output in `[0, q)`.
pub fn mul_coeffs_barrett_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| b_red(a, b, q, brc));
}

/// Lazy sibling of [`mul_coeffs_barrett_vec`]; output in `[0, 2q)`.
pub fn mul_coeffs_barrett_lazy_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| b_red_lazy(a, b, q, brc));
}

/// `p3 = p1 * p2 * 2^{-64} mod q`; output in `[0, q)`.
pub fn mul_coeffs_montgomery_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64, mrc: u64) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| m_red(a, b, q, mrc));
}

/// Lazy sibling of [`mul_coeffs_montgomery_vec`]; output in `[0, 2q)`.
pub fn mul_coeffs_montgomery_lazy_vec(p1: &[u64], p2: &[u64], p3: &mut [u64], q: u64, mrc: u64) {
    check_binary(p1, p2, p3);
    for_each_block!(p1, p2, p3, |a, b| m_red_lazy(a, b, q, mrc));
}

/// `p3 += p1 * p2` (Montgomery); output in `[0, q)`.
pub fn mul_coeffs_montgomery_then_add_vec(
    p1: &[u64],
    p2: &[u64],
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_binary(p1, p2, p3);
    for_each_block!(acc p1, p2, p3, |a, b, c| c_red(c + m_red(a, b, q, mrc), q));
}

/// `p3 += p1 * p2` (Montgomery, no reduction); output in `[0, 3q)` for
/// `p3` inputs in `[0, q)`.
pub fn mul_coeffs_montgomery_then_add_lazy_vec(
    p1: &[u64],
    p2: &[u64],
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_binary(p1, p2, p3);
    for_each_block!(acc p1, p2, p3, |a, b, c| c + m_red_lazy(a, b, q, mrc));
}

/// `p3 -= p1 * p2` (Montgomery); output in `[0, q)`.
pub fn mul_coeffs_montgomery_then_sub_vec(
    p1: &[u64],
    p2: &[u64],
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_binary(p1, p2, p3);
    for_each_block!(acc p1, p2, p3, |a, b, c| c_red(c + q - m_red(a, b, q, mrc), q));
}

/// `p3 -= p1 * p2` (Montgomery, no reduction); output in `[0, 3q)` for
/// `p3` inputs in `[0, q)`.
pub fn mul_coeffs_montgomery_then_sub_lazy_vec(
    p1: &[u64],
    p2: &[u64],
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_binary(p1, p2, p3);
    for_each_block!(acc p1, p2, p3, |a, b, c| c + 2 * q - m_red_lazy(a, b, q, mrc));
}

/// `p3 = p1 * 2^64 mod q`; output in `[0, q)`.
pub fn m_form_vec(p1: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| m_form(a, q, brc));
}

/// Lazy sibling of [`m_form_vec`]; output in `[0, 2q)`.
pub fn m_form_lazy_vec(p1: &[u64], p3: &mut [u64], q: u64, brc: [u64; 2]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| m_form_lazy(a, q, brc));
}

/// `p3 = p1 * 2^{-64} mod q`; output in `[0, q)`.
pub fn i_m_form_vec(p1: &[u64], p3: &mut [u64], q: u64, mrc: u64) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| i_m_form(a, q, mrc));
}

/// `p3 = p1 + scalar mod q`; `scalar` in `[0, q)`, output in `[0, q)`.
pub fn add_scalar_vec(p1: &[u64], scalar: u64, p3: &mut [u64], q: u64) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| c_red(a + scalar, q));
}

/// `p3 = p1 + scalar`; output in `[0, 2q)`.
pub fn add_scalar_lazy_vec(p1: &[u64], scalar: u64, p3: &mut [u64]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| a + scalar);
}

/// `p3 = p1 - scalar mod q`; `scalar` in `[0, q)`, output in `[0, q)`.
pub fn sub_scalar_vec(p1: &[u64], scalar: u64, p3: &mut [u64], q: u64) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| c_red(a + q - scalar, q));
}

/// `p3 = p1 * scalar mod q`; `scalar_mont` in Montgomery form, output in
/// `[0, q)`.
pub fn mul_scalar_montgomery_vec(p1: &[u64], scalar_mont: u64, p3: &mut [u64], q: u64, mrc: u64) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| m_red(a, scalar_mont, q, mrc));
}

/// Lazy sibling of [`mul_scalar_montgomery_vec`]; output in `[0, 2q)`.
pub fn mul_scalar_montgomery_lazy_vec(
    p1: &[u64],
    scalar_mont: u64,
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| m_red_lazy(a, scalar_mont, q, mrc));
}

/// `p3 += p1 * scalar mod q`; output in `[0, q)`.
pub fn mul_scalar_montgomery_then_add_vec(
    p1: &[u64],
    scalar_mont: u64,
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_unary(p1, p3);
    for (z, x) in p3.chunks_exact_mut(8).zip(p1.chunks_exact(8)) {
        for k in 0..8 {
            z[k] = c_red(z[k] + m_red(x[k], scalar_mont, q, mrc), q);
        }
    }
}

/// `p3 = p1 * scalar_1 + scalar_0 mod q`; output in `[0, q)`.
pub fn mul_scalar_montgomery_then_add_scalar_vec(
    p1: &[u64],
    scalar_0: u64,
    scalar_mont_1: u64,
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| c_red(m_red(a, scalar_mont_1, q, mrc) + scalar_0, q));
}

/// `p3 = (p1 + 2q - p2) * scalar mod q`; accepts `p2` in `[0, 2q)`,
/// output in `[0, q)`.
pub fn sub_then_mul_scalar_montgomery_two_modulus_vec(
    p1: &[u64],
    p2: &[u64],
    scalar_mont: u64,
    p3: &mut [u64],
    q: u64,
    mrc: u64,
) {
    check_binary(p1, p2, p3);
    let two_q = q << 1;
    for_each_block!(p1, p2, p3, |a, b| m_red(a + two_q - b, scalar_mont, q, mrc));
}

/// `p3 = 0`.
pub fn zero_vec(p3: &mut [u64]) {
    for z in p3.iter_mut() {
        *z = 0;
    }
}

/// `p3 = (p1 >> shift) & mask`.
pub fn mask_vec(p1: &[u64], shift: usize, mask: u64, p3: &mut [u64]) {
    check_unary(p1, p3);
    for_each_block!(p1, p3, |a| (a >> shift) & mask);
}
