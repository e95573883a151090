//! Number-Theoretic Transform over Z_q[X]/(X^N+1)
//!
//! In-place Cooley-Tukey (forward) and Gentleman-Sande (backward) schedules
//! driven by bit-reversed root tables in Montgomery form. Butterflies work on
//! lazy operands: every value entering a butterfly is kept below `4q`, and
//! the lazy entry points fold their output into `[0, 2q)`. The
//! conjugate-invariant flavour folds the mirrored half through the first-pass
//! butterfly and unfolds it on the way back.

use crate::arith::modular::{b_red_add, m_red, m_red_lazy};

/// Cooley-Tukey butterfly on lazy operands.
///
/// `u` may be any value below `6q`; `psi` is a Montgomery-form twiddle.
/// Outputs are below `6q`.
#[inline(always)]
fn butterfly(
    mut u: u64,
    v: u64,
    psi: u64,
    two_q: u64,
    four_q: u64,
    q: u64,
    mrc: u64,
) -> (u64, u64) {
    if u >= four_q {
        u -= four_q;
    }
    let v = m_red_lazy(v, psi, q, mrc);
    (u + v, u + two_q - v)
}

/// Gentleman-Sande butterfly on lazy operands.
///
/// Inputs below `2q` produce outputs below `2q`.
#[inline(always)]
fn inv_butterfly(
    u: u64,
    v: u64,
    psi: u64,
    two_q: u64,
    four_q: u64,
    q: u64,
    mrc: u64,
) -> (u64, u64) {
    let mut x = u + v;
    if x >= two_q {
        x -= two_q;
    }
    let y = m_red_lazy(u + four_q - v, psi, q, mrc);
    (x, y)
}

/// Brings every coefficient from `[0, 8q)` into `[0, 2q)`.
fn fold_two_q(p: &mut [u64], q: u64) {
    let two_q = q << 1;
    let four_q = q << 2;
    for x in p.iter_mut() {
        if *x >= four_q {
            *x -= four_q;
        }
        if *x >= two_q {
            *x -= two_q;
        }
    }
}

/// One forward stage: `groups` butterfly groups of span `t`, group `i`
/// twiddled by `roots[m + i]`.
#[inline(always)]
fn forward_stage(
    p: &mut [u64],
    m: usize,
    groups: usize,
    t: usize,
    roots: &[u64],
    q: u64,
    mrc: u64,
) {
    let two_q = q << 1;
    let four_q = q << 2;
    if t >= 8 {
        for i in 0..groups {
            let s = roots[m + i];
            let j1 = 2 * i * t;
            let (lo, hi) = p[j1..j1 + 2 * t].split_at_mut(t);
            for (x8, y8) in lo.chunks_exact_mut(8).zip(hi.chunks_exact_mut(8)) {
                for k in 0..8 {
                    let (x, y) = butterfly(x8[k], y8[k], s, two_q, four_q, q, mrc);
                    x8[k] = x;
                    y8[k] = y;
                }
            }
        }
    } else if p.len() >= 16 {
        // t is 4, 2, or 1: a 16-coefficient block spans 8/t butterfly
        // groups with consecutive twiddles
        let per_block = 8 / t;
        debug_assert_eq!(groups, (p.len() / 16) * per_block);
        for (blk, chunk) in p.chunks_exact_mut(16).enumerate() {
            let i0 = blk * per_block;
            for g in 0..per_block {
                let s = roots[m + i0 + g];
                let base = 2 * g * t;
                for j in base..base + t {
                    let (x, y) = butterfly(chunk[j], chunk[j + t], s, two_q, four_q, q, mrc);
                    chunk[j] = x;
                    chunk[j + t] = y;
                }
            }
        }
    } else {
        for i in 0..groups {
            let s = roots[m + i];
            let j1 = 2 * i * t;
            for j in j1..j1 + t {
                let (x, y) = butterfly(p[j], p[j + t], s, two_q, four_q, q, mrc);
                p[j] = x;
                p[j + t] = y;
            }
        }
    }
}

#[inline(always)]
fn backward_stage(
    p: &mut [u64],
    m: usize,
    groups: usize,
    t: usize,
    roots_inv: &[u64],
    q: u64,
    mrc: u64,
) {
    let two_q = q << 1;
    let four_q = q << 2;
    if t >= 8 {
        for i in 0..groups {
            let s = roots_inv[m + i];
            let j1 = 2 * i * t;
            let (lo, hi) = p[j1..j1 + 2 * t].split_at_mut(t);
            for (x8, y8) in lo.chunks_exact_mut(8).zip(hi.chunks_exact_mut(8)) {
                for k in 0..8 {
                    let (x, y) = inv_butterfly(x8[k], y8[k], s, two_q, four_q, q, mrc);
                    x8[k] = x;
                    y8[k] = y;
                }
            }
        }
    } else if p.len() >= 16 {
        let per_block = 8 / t;
        debug_assert_eq!(groups, (p.len() / 16) * per_block);
        for (blk, chunk) in p.chunks_exact_mut(16).enumerate() {
            let i0 = blk * per_block;
            for g in 0..per_block {
                let s = roots_inv[m + i0 + g];
                let base = 2 * g * t;
                for j in base..base + t {
                    let (x, y) = inv_butterfly(chunk[j], chunk[j + t], s, two_q, four_q, q, mrc);
                    chunk[j] = x;
                    chunk[j + t] = y;
                }
            }
        }
    } else {
        for i in 0..groups {
            let s = roots_inv[m + i];
            let j1 = 2 * i * t;
            for j in j1..j1 + t {
                let (x, y) = inv_butterfly(p[j], p[j + t], s, two_q, four_q, q, mrc);
                p[j] = x;
                p[j + t] = y;
            }
        }
    }
}

fn forward_core(p: &mut [u64], q: u64, mrc: u64, roots: &[u64]) {
    let n = p.len();
    let mut t = n;
    let mut m = 1;
    while m < n {
        t >>= 1;
        forward_stage(p, m, m, t, roots, q, mrc);
        m <<= 1;
    }
}

fn backward_core(p: &mut [u64], q: u64, mrc: u64, roots_inv: &[u64]) {
    let n = p.len();
    let mut t = 1;
    let mut m = n;
    while m > 1 {
        let h = m >> 1;
        backward_stage(p, h, h, t, roots_inv, q, mrc);
        t <<= 1;
        m >>= 1;
    }
}

/// In-place nega-cyclic forward transform; output in `[0, 2q)`.
pub fn ntt_standard_lazy(p: &mut [u64], q: u64, mrc: u64, roots: &[u64]) {
    forward_core(p, q, mrc, roots);
    fold_two_q(p, q);
}

/// In-place nega-cyclic forward transform; output in `[0, q)`.
pub fn ntt_standard(p: &mut [u64], q: u64, mrc: u64, brc: [u64; 2], roots: &[u64]) {
    forward_core(p, q, mrc, roots);
    for x in p.iter_mut() {
        *x = b_red_add(*x, q, brc);
    }
}

/// In-place nega-cyclic backward transform; input in `[0, 2q)`, output in
/// `[0, 2q)`.
pub fn intt_standard_lazy(p: &mut [u64], q: u64, mrc: u64, n_inv: u64, roots_inv: &[u64]) {
    backward_core(p, q, mrc, roots_inv);
    for x in p.iter_mut() {
        *x = m_red_lazy(*x, n_inv, q, mrc);
    }
}

/// In-place nega-cyclic backward transform; input in `[0, 2q)`, output in
/// `[0, q)`.
pub fn intt_standard(p: &mut [u64], q: u64, mrc: u64, n_inv: u64, roots_inv: &[u64]) {
    backward_core(p, q, mrc, roots_inv);
    for x in p.iter_mut() {
        *x = m_red(*x, n_inv, q, mrc);
    }
}

/// First pass of the conjugate-invariant forward transform: folds the
/// mirrored half through `roots[1]` (the 2N-th stage-one twiddle).
fn fold_mirror(p: &mut [u64], psi: u64, q: u64, mrc: u64) {
    let n = p.len();
    let two_q = q << 1;
    for j in 1..n >> 1 {
        let (a, b) = (p[j], p[n - j]);
        p[j] = a + two_q - m_red_lazy(b, psi, q, mrc);
        p[n - j] = b + two_q - m_red_lazy(a, psi, q, mrc);
    }
    // index N/2 pairs with itself, index 0 is carried through
    let mid = p[n >> 1];
    p[n >> 1] = mid + two_q - m_red_lazy(mid, psi, q, mrc);
}

fn forward_core_conjugate_invariant(p: &mut [u64], q: u64, mrc: u64, roots: &[u64]) {
    let n = p.len();
    fold_mirror(p, roots[1], q, mrc);
    // remaining stages of the folded 2N-point schedule; only the groups
    // landing in the retained half are materialised
    let mut t = n >> 1;
    let mut m = 2;
    while m < n << 1 {
        forward_stage(p, m, m >> 1, t, roots, q, mrc);
        t >>= 1;
        m <<= 1;
    }
}

fn backward_core_conjugate_invariant(p: &mut [u64], q: u64, mrc: u64, roots_inv: &[u64]) {
    let n = p.len();
    let mut t = 1;
    let mut m = n;
    while m >= 2 {
        backward_stage(p, m, m >> 1, t, roots_inv, q, mrc);
        t <<= 1;
        m >>= 1;
    }
    // re-fold the mirrored half; (1 - psi^{2N}) = 2 makes the doubling of
    // the constant term exact
    let n_half = n >> 1;
    let psi_inv = roots_inv[1];
    let two_q = q << 1;
    for j in 1..n_half {
        let (a, b) = (p[j], p[n - j]);
        p[j] = a + two_q - m_red_lazy(b, psi_inv, q, mrc);
        p[n - j] = b + two_q - m_red_lazy(a, psi_inv, q, mrc);
    }
    let mid = p[n_half];
    p[n_half] = mid + two_q - m_red_lazy(mid, psi_inv, q, mrc);
    p[0] <<= 1;
}

/// In-place conjugate-invariant forward transform; output in `[0, 2q)`.
pub fn ntt_conjugate_invariant_lazy(p: &mut [u64], q: u64, mrc: u64, roots: &[u64]) {
    forward_core_conjugate_invariant(p, q, mrc, roots);
    fold_two_q(p, q);
}

/// In-place conjugate-invariant forward transform; output in `[0, q)`.
pub fn ntt_conjugate_invariant(p: &mut [u64], q: u64, mrc: u64, brc: [u64; 2], roots: &[u64]) {
    forward_core_conjugate_invariant(p, q, mrc, roots);
    for x in p.iter_mut() {
        *x = b_red_add(*x, q, brc);
    }
}

/// In-place conjugate-invariant backward transform; input in `[0, 2q)`,
/// output in `[0, 2q)`.
pub fn intt_conjugate_invariant_lazy(
    p: &mut [u64],
    q: u64,
    mrc: u64,
    n_inv: u64,
    roots_inv: &[u64],
) {
    backward_core_conjugate_invariant(p, q, mrc, roots_inv);
    for x in p.iter_mut() {
        *x = m_red_lazy(*x, n_inv, q, mrc);
    }
}

/// In-place conjugate-invariant backward transform; input in `[0, 2q)`,
/// output in `[0, q)`.
pub fn intt_conjugate_invariant(p: &mut [u64], q: u64, mrc: u64, n_inv: u64, roots_inv: &[u64]) {
    backward_core_conjugate_invariant(p, q, mrc, roots_inv);
    for x in p.iter_mut() {
        *x = m_red(*x, n_inv, q, mrc);
    }
}
