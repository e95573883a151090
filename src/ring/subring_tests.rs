use crate::arith::modular::{i_m_form, m_red};
use crate::errors::RingError;
use crate::ring::subring::{bit_reverse, NttKind, SubRing};

#[test]
fn construction_validates_parameters() {
    assert!(matches!(
        SubRing::new(12, 17, NttKind::Standard),
        Err(RingError::InvalidRingDegree(12))
    ));
    assert!(matches!(
        SubRing::new(4, 17, NttKind::Standard),
        Err(RingError::InvalidRingDegree(4))
    ));
    assert!(matches!(
        SubRing::new(8, 15, NttKind::Standard),
        Err(RingError::InvalidModulus { .. })
    ));
    // 113 is prime but 113 != 1 mod 32
    assert!(matches!(
        SubRing::new(16, 113, NttKind::Standard),
        Err(RingError::InvalidModulus { .. })
    ));
    // 97 = 1 mod 32 but 97 != 1 mod 64, so no conjugate-invariant degree 16
    assert!(matches!(
        SubRing::new(16, 97, NttKind::ConjugateInvariant),
        Err(RingError::InvalidModulus { .. })
    ));
    assert!(SubRing::new(16, 97, NttKind::Standard).is_ok());
    assert!(SubRing::new(8, 97, NttKind::ConjugateInvariant).is_ok());
}

#[test]
fn supplied_primitive_root_is_checked() {
    assert!(SubRing::new_with_primitive_root(8, 17, NttKind::Standard, 3, vec![2]).is_ok());
    assert!(matches!(
        SubRing::new_with_primitive_root(8, 17, NttKind::Standard, 2, vec![2]),
        Err(RingError::InvalidPrimitiveRoot { .. })
    ));
    assert!(matches!(
        SubRing::new_with_primitive_root(8, 17, NttKind::Standard, 3, vec![4]),
        Err(RingError::CompositeFactor(4))
    ));
}

#[test]
fn context_constants() {
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    assert_eq!(s.nth_root, 16);
    assert_eq!(s.primitive_root, 3);
    assert_eq!(s.factors, vec![2]);
    assert_eq!(s.roots_forward.len(), 8);

    // n_inv is 8^{-1} mod 17 in Montgomery form
    let n_inv = i_m_form(s.n_inv, 17, s.m_red_constant);
    assert_eq!(n_inv * 8 % 17, 1);

    // the root tables hold psi^j at bit-reversed positions; psi = 3^(16/16) = 3
    let log_len = 3;
    let mut psi_pow = 1u64;
    for j in 0..8 {
        let fwd = i_m_form(s.roots_forward[bit_reverse(j, log_len)], 17, s.m_red_constant);
        assert_eq!(fwd, psi_pow, "forward root {} mismatch", j);
        psi_pow = psi_pow * 3 % 17;
    }

    // forward and backward tables cancel
    for j in 0..8 {
        let prod = m_red(
            s.roots_forward[bit_reverse(j, log_len)],
            s.roots_backward[bit_reverse(j, log_len)],
            17,
            s.m_red_constant,
        );
        assert_eq!(i_m_form(prod, 17, s.m_red_constant), 1);
    }
}

#[test]
fn serialization_round_trip() {
    for (n, q, kind) in [
        (8usize, 17u64, NttKind::Standard),
        (16, 97, NttKind::Standard),
        (8, 97, NttKind::ConjugateInvariant),
    ] {
        let s = SubRing::new(n, q, kind).unwrap();
        let bytes = s.to_bytes();
        let (back, used) = SubRing::from_bytes(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        assert_eq!(back.n, s.n);
        assert_eq!(back.modulus, s.modulus);
        assert_eq!(back.nth_root, s.nth_root);
        assert_eq!(back.primitive_root, s.primitive_root);
        assert_eq!(back.roots_forward, s.roots_forward);
    }
}

#[test]
fn serialization_rejects_corruption() {
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let mut bytes = s.to_bytes();
    bytes[0] = 9;
    assert!(SubRing::from_bytes(&bytes).is_err());
    assert!(SubRing::from_bytes(&bytes[..4]).is_err());
}
