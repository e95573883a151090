use super::modular::{gen_b_red_constant, gen_m_red_constant, m_form};
use super::vec_ops::*;

const Q: u64 = 97;
const N: usize = 16;

fn brc() -> [u64; 2] {
    gen_b_red_constant(Q)
}

fn mrc() -> u64 {
    gen_m_red_constant(Q)
}

fn ramp(offset: u64) -> Vec<u64> {
    (0..N as u64).map(|i| (i * 7 + offset) % Q).collect()
}

#[test]
fn add_sub_neg() {
    let (p1, p2) = (ramp(3), ramp(60));
    let mut p3 = vec![0u64; N];

    add_vec(&p1, &p2, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] + p2[i]) % Q);
    }

    sub_vec(&p1, &p2, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] + Q - p2[i]) % Q);
    }

    add_vec_lazy(&p1, &p2, &mut p3);
    for i in 0..N {
        assert_eq!(p3[i], p1[i] + p2[i]);
        assert!(p3[i] < 2 * Q);
    }

    sub_vec_lazy(&p1, &p2, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i], p1[i] + Q - p2[i]);
    }

    neg_vec(&p1, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i] % Q, (Q - p1[i]) % Q);
        assert!(p3[i] <= Q);
    }
}

#[test]
fn reductions() {
    let raw: Vec<u64> = (0..N as u64).map(|i| i * 123_456_789 + 5).collect();
    let mut out = vec![0u64; N];

    reduce_vec(&raw, &mut out, Q, brc());
    for i in 0..N {
        assert_eq!(out[i], raw[i] % Q);
    }

    reduce_vec_lazy(&raw, &mut out, Q, brc());
    for i in 0..N {
        assert!(out[i] < 2 * Q);
        assert_eq!(out[i] % Q, raw[i] % Q);
    }
}

#[test]
fn multiplications() {
    let (p1, p2) = (ramp(1), ramp(9));
    let mut p3 = vec![0u64; N];

    mul_coeffs_barrett_vec(&p1, &p2, &mut p3, Q, brc());
    for i in 0..N {
        assert_eq!(p3[i], p1[i] * p2[i] % Q);
    }

    // one Montgomery operand makes the product land in the plain domain
    let mut p1m = vec![0u64; N];
    m_form_vec(&p1, &mut p1m, Q, brc());
    mul_coeffs_montgomery_vec(&p1m, &p2, &mut p3, Q, mrc());
    for i in 0..N {
        assert_eq!(p3[i], p1[i] * p2[i] % Q);
    }

    mul_coeffs_montgomery_lazy_vec(&p1m, &p2, &mut p3, Q, mrc());
    for i in 0..N {
        assert!(p3[i] < 2 * Q);
        assert_eq!(p3[i] % Q, p1[i] * p2[i] % Q);
    }

    let mut back = vec![0u64; N];
    i_m_form_vec(&p1m, &mut back, Q, mrc());
    assert_eq!(back, p1);
}

#[test]
fn fused_accumulation() {
    let (p1, p2) = (ramp(2), ramp(11));
    let mut p1m = vec![0u64; N];
    m_form_vec(&p1, &mut p1m, Q, brc());

    let mut acc = ramp(5);
    let base = acc.clone();
    mul_coeffs_montgomery_then_add_vec(&p1m, &p2, &mut acc, Q, mrc());
    for i in 0..N {
        assert_eq!(acc[i], (base[i] + p1[i] * p2[i]) % Q);
    }

    let mut acc = ramp(5);
    mul_coeffs_montgomery_then_sub_vec(&p1m, &p2, &mut acc, Q, mrc());
    for i in 0..N {
        assert_eq!(acc[i], (base[i] + Q * Q - p1[i] * p2[i]) % Q);
    }

    let mut acc = ramp(5);
    mul_coeffs_montgomery_then_add_lazy_vec(&p1m, &p2, &mut acc, Q, mrc());
    for i in 0..N {
        assert!(acc[i] < 3 * Q);
        assert_eq!(acc[i] % Q, (base[i] + p1[i] * p2[i]) % Q);
    }

    let mut acc = ramp(5);
    mul_coeffs_montgomery_then_sub_lazy_vec(&p1m, &p2, &mut acc, Q, mrc());
    for i in 0..N {
        assert!(acc[i] < 3 * Q);
        assert_eq!(acc[i] % Q, (base[i] + Q * Q - p1[i] * p2[i]) % Q);
    }
}

#[test]
fn scalar_kernels() {
    let p1 = ramp(4);
    let mut p3 = vec![0u64; N];
    let s = 29u64;
    let sm = m_form(s, Q, brc());

    add_scalar_vec(&p1, s, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] + s) % Q);
    }

    sub_scalar_vec(&p1, s, &mut p3, Q);
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] + Q - s) % Q);
    }

    mul_scalar_montgomery_vec(&p1, sm, &mut p3, Q, mrc());
    for i in 0..N {
        assert_eq!(p3[i], p1[i] * s % Q);
    }

    let mut acc = ramp(8);
    let base = acc.clone();
    mul_scalar_montgomery_then_add_vec(&p1, sm, &mut acc, Q, mrc());
    for i in 0..N {
        assert_eq!(acc[i], (base[i] + p1[i] * s) % Q);
    }

    mul_scalar_montgomery_then_add_scalar_vec(&p1, 7, sm, &mut p3, Q, mrc());
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] * s + 7) % Q);
    }
}

#[test]
fn fused_two_modulus_subtract() {
    // p2 may be lazy, in [0, 2q)
    let p1 = ramp(3);
    let p2: Vec<u64> = ramp(40).iter().map(|&x| x + Q).collect();
    let s = 31u64;
    let sm = m_form(s, Q, brc());
    let mut p3 = vec![0u64; N];
    sub_then_mul_scalar_montgomery_two_modulus_vec(&p1, &p2, sm, &mut p3, Q, mrc());
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] + 2 * Q - p2[i]) % Q * s % Q);
    }
}

#[test]
fn zero_and_mask() {
    let p1: Vec<u64> = (0..N as u64).map(|i| i << 4).collect();
    let mut p3 = vec![1u64; N];
    zero_vec(&mut p3);
    assert!(p3.iter().all(|&c| c == 0));

    mask_vec(&p1, 4, 0x7, &mut p3);
    for i in 0..N {
        assert_eq!(p3[i], (p1[i] >> 4) & 0x7);
    }
}

#[test]
#[should_panic(expected = "multiple of 8")]
fn rejects_ragged_slices() {
    let p1 = vec![0u64; 12];
    let p2 = vec![0u64; 12];
    let mut p3 = vec![0u64; 12];
    add_vec(&p1, &p2, &mut p3, Q);
}
