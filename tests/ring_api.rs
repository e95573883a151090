//! End-to-end scenarios through the public API

use num_bigint::BigUint;
use rns_ring::ring::{NttKind, Ring};

#[test]
fn ntt_round_trip_degree_eight() {
    let ring = Ring::new(8, &[17]).unwrap();
    let mut p = ring.new_poly();
    ring.set_coefficients_u64(&[1, 2, 3, 4, 5, 6, 7, 8], &mut p);
    let orig = p.clone();
    let mut t = ring.new_poly();
    ring.ntt(&p, &mut t);
    let mut back = ring.new_poly();
    ring.intt(&t, &mut back);
    assert_eq!(back, orig);
}

#[test]
fn constant_one_evaluates_to_ones() {
    let ring = Ring::new(8, &[17]).unwrap();
    let mut p = ring.new_poly();
    ring.set_coefficients_u64(&[1, 0, 0, 0, 0, 0, 0, 0], &mut p);
    let mut t = ring.new_poly();
    ring.ntt(&p, &mut t);
    assert_eq!(t.coeffs[0], vec![1u64; 8]);
}

#[test]
fn binomial_square() {
    // (1 + X)^2 = 1 + 2X + X^2
    let ring = Ring::new(8, &[17]).unwrap();
    let mut p = ring.new_poly();
    ring.set_coefficients_u64(&[1, 1, 0, 0, 0, 0, 0, 0], &mut p);

    let mut pm = ring.new_poly();
    ring.m_form(&p, &mut pm);
    ring.ntt_inplace(&mut pm);
    let mut pt = ring.new_poly();
    ring.ntt(&p, &mut pt);
    let mut prod = ring.new_poly();
    ring.mul_coeffs_montgomery(&pm, &pt, &mut prod);
    ring.intt_inplace(&mut prod);
    assert_eq!(prod.coeffs[0], vec![1, 2, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn subtraction_wraps_into_range() {
    let ring = Ring::new(16, &[97]).unwrap();
    let mut p1 = ring.new_poly();
    let mut p2 = ring.new_poly();
    ring.set_coefficients_u64(&[5; 16], &mut p1);
    ring.set_coefficients_u64(&[10; 16], &mut p2);
    let mut p3 = ring.new_poly();
    ring.sub(&p1, &p2, &mut p3);
    assert!(p3.coeffs[0].iter().all(|&c| c == 92));
}

#[test]
fn crt_reconstructs_forty_two() {
    let ring = Ring::new(8, &[97, 113]).unwrap();
    let mut p = ring.new_poly();
    let mut values = [0u64; 8];
    values[0] = 42;
    ring.set_coefficients_u64(&values, &mut p);
    assert_eq!(p.coeffs[0][0], 42 % 97);
    assert_eq!(p.coeffs[1][0], 42 % 113);
    let back = ring.poly_to_bigint(&p);
    assert_eq!(back[0], BigUint::from(42u64));
}

#[test]
fn conjugate_invariant_ring_round_trip() {
    let ring = Ring::new_conjugate_invariant(8, &[97]).unwrap();
    assert_eq!(ring.ntt_kind(), NttKind::ConjugateInvariant);
    let mut p = ring.new_poly();
    ring.set_coefficients_u64(&[9, 8, 7, 6, 5, 4, 3, 2], &mut p);
    let orig = p.clone();
    ring.ntt_inplace(&mut p);
    ring.intt_inplace(&mut p);
    assert_eq!(p, orig);
}

#[test]
fn non_lazy_operations_keep_canonical_range() {
    let ring = Ring::new(16, &[97, 193]).unwrap();
    let mut p1 = ring.new_poly();
    let mut p2 = ring.new_poly();
    ring.set_coefficients_u64(&(0..16).map(|i| i * 13).collect::<Vec<_>>(), &mut p1);
    ring.set_coefficients_u64(&(0..16).map(|i| i * 29 + 7).collect::<Vec<_>>(), &mut p2);
    let mut out = ring.new_poly();

    ring.add(&p1, &p2, &mut out);
    check_canonical(&ring, &out);
    ring.sub(&p1, &p2, &mut out);
    check_canonical(&ring, &out);
    ring.mul_coeffs_barrett(&p1, &p2, &mut out);
    check_canonical(&ring, &out);
    ring.ntt(&p1, &mut out);
    check_canonical(&ring, &out);
    ring.intt(&p1, &mut out);
    check_canonical(&ring, &out);
}

fn check_canonical(ring: &Ring, p: &rns_ring::Poly) {
    for (i, s) in ring.active().iter().enumerate() {
        assert!(
            p.coeffs[i].iter().all(|&c| c < s.modulus),
            "coefficients must stay below q_{}",
            i
        );
    }
}
