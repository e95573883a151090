//! Bit-exact wire layouts

use rns_ring::ring::{NttKind, Poly, Ring, SubRing};
use rns_ring::Distribution;

#[test]
fn subring_record_layout() {
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let bytes = s.to_bytes();
    // kind, log2(N), nth_root/N, modulus, factor count, factors, generator
    assert_eq!(bytes[0], 0);
    assert_eq!(bytes[1], 3);
    assert_eq!(bytes[2], 2);
    assert_eq!(&bytes[3..11], &17u64.to_le_bytes());
    assert_eq!(bytes[11], 1);
    assert_eq!(&bytes[12..20], &2u64.to_le_bytes());
    assert_eq!(&bytes[20..28], &3u64.to_le_bytes());
    assert_eq!(bytes.len(), 28);

    let ci = SubRing::new(8, 97, NttKind::ConjugateInvariant).unwrap();
    let bytes = ci.to_bytes();
    assert_eq!(bytes[0], 1);
    assert_eq!(bytes[2], 4);
}

#[test]
fn ring_record_is_count_prefixed() {
    let r = Ring::new(8, &[17, 97]).unwrap();
    let bytes = r.to_bytes();
    assert_eq!(bytes[0], 2);
    let back = Ring::from_bytes(&bytes).unwrap();
    assert_eq!(back.moduli(), vec![17, 97]);

    // a tampered modulus must fail revalidation
    let mut bad = bytes.clone();
    bad[4] = 18; // 17 -> 18, composite
    assert!(Ring::from_bytes(&bad).is_err());
}

#[test]
fn poly_record_layout() {
    let mut p = Poly::new(8, 1);
    p.coeffs[0][0] = 0x0102030405060708;
    p.coeffs[1][7] = 42;
    let bytes = p.to_bytes();
    assert_eq!(&bytes[..4], &[0, 0, 0, 2]); // big-endian residue count
    assert_eq!(&bytes[4..8], &[0, 0, 0, 8]); // big-endian degree
    assert_eq!(&bytes[8..16], &[8, 7, 6, 5, 4, 3, 2, 1]); // little-endian words
    let back = Poly::from_bytes(&bytes).unwrap();
    assert_eq!(back, p);

    assert!(Poly::from_bytes(&bytes[..10]).is_err());
    assert!(Poly::from_bytes(&[]).is_err());
}

#[test]
fn distribution_tag_layout() {
    let g = Distribution::Gaussian { sigma: 3.2, bound: 19 };
    let bytes = g.encode();
    assert_eq!(bytes[0], 0);
    assert_eq!(&bytes[1..9], &3.2f64.to_le_bytes());
    assert_eq!(&bytes[9..17], &19u64.to_le_bytes());

    assert_eq!(Distribution::UniformTernary { p: 0.5 }.encode()[0], 1);
    assert_eq!(Distribution::SparseTernary { hamming: 3 }.encode()[0], 2);
    assert_eq!(Distribution::Uniform.encode(), vec![3]);
}
