use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ring::subring::{NttKind, SubRing};

fn random_row(rng: &mut StdRng, n: usize, q: u64) -> Vec<u64> {
    (0..n).map(|_| rng.gen_range(0..q)).collect()
}

#[test]
fn forward_backward_identity_small() {
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let p: Vec<u64> = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let mut t = vec![0u64; 8];
    let mut back = vec![0u64; 8];
    s.ntt(&p, &mut t);
    s.intt(&t, &mut back);
    assert_eq!(back, p);
}

#[test]
fn constant_polynomial_transforms_to_ones() {
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let p = vec![1u64, 0, 0, 0, 0, 0, 0, 0];
    let mut t = vec![0u64; 8];
    s.ntt(&p, &mut t);
    assert_eq!(t, vec![1u64; 8]);
}

#[test]
fn convolution_matches_schoolbook() {
    // (1 + X)^2 = 1 + 2X + X^2 in Z_17[X]/(X^8+1)
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let p = vec![1u64, 1, 0, 0, 0, 0, 0, 0];

    let mut pm = vec![0u64; 8];
    s.m_form(&p, &mut pm);
    s.ntt_inplace(&mut pm);
    let mut qt = vec![0u64; 8];
    s.ntt(&p, &mut qt);

    let mut prod = vec![0u64; 8];
    s.mul_coeffs_montgomery(&pm, &qt, &mut prod);
    s.intt_inplace(&mut prod);
    assert_eq!(prod, vec![1, 2, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn negacyclic_wraparound() {
    // X^7 * X = X^8 = -1
    let s = SubRing::new(8, 17, NttKind::Standard).unwrap();
    let mut a = vec![0u64; 8];
    a[7] = 1;
    let mut b = vec![0u64; 8];
    b[1] = 1;

    let mut am = vec![0u64; 8];
    s.m_form(&a, &mut am);
    s.ntt_inplace(&mut am);
    s.ntt_inplace(&mut b);
    let mut c = vec![0u64; 8];
    s.mul_coeffs_montgomery(&am, &b, &mut c);
    s.intt_inplace(&mut c);
    assert_eq!(c, vec![16, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn forward_backward_identity_random() {
    let mut rng = StdRng::seed_from_u64(17);
    for (n, q) in [(16usize, 97u64), (32, 193), (64, 257), (256, 7681)] {
        let s = SubRing::new(n, q, NttKind::Standard).unwrap();
        for _ in 0..20 {
            let p = random_row(&mut rng, n, q);
            let mut w = p.clone();
            s.ntt_inplace(&mut w);
            s.intt_inplace(&mut w);
            assert_eq!(w, p, "round trip failed for n={} q={}", n, q);
        }
    }
}

#[test]
fn lazy_outputs_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(23);
    let s = SubRing::new(64, 257, NttKind::Standard).unwrap();
    for _ in 0..20 {
        let p = random_row(&mut rng, 64, 257);
        let mut w = p.clone();
        s.ntt_lazy_inplace(&mut w);
        assert!(w.iter().all(|&c| c < 2 * 257), "lazy NTT output out of range");
        s.intt_lazy_inplace(&mut w);
        assert!(w.iter().all(|&c| c < 2 * 257), "lazy INTT output out of range");
        for (a, b) in w.iter().zip(p.iter()) {
            assert_eq!(a % 257, b % 257);
        }
    }
}

#[test]
fn transform_is_linear() {
    let mut rng = StdRng::seed_from_u64(31);
    let (n, q) = (32usize, 193u64);
    let s = SubRing::new(n, q, NttKind::Standard).unwrap();
    let (a, b) = (5u64, 11u64);
    let am = s.m_form_scalar(a);
    let bm = s.m_form_scalar(b);

    let p = random_row(&mut rng, n, q);
    let r = random_row(&mut rng, n, q);

    // a*p + b*r, then transform
    let mut lhs = vec![0u64; n];
    let mut tmp = vec![0u64; n];
    s.mul_scalar_montgomery(&p, am, &mut lhs);
    s.mul_scalar_montgomery(&r, bm, &mut tmp);
    let mut sum = vec![0u64; n];
    s.add(&lhs, &tmp, &mut sum);
    s.ntt_inplace(&mut sum);

    // transform, then a*p + b*r
    let mut pt = p.clone();
    let mut rt = r.clone();
    s.ntt_inplace(&mut pt);
    s.ntt_inplace(&mut rt);
    s.mul_scalar_montgomery(&pt, am, &mut lhs);
    s.mul_scalar_montgomery(&rt, bm, &mut tmp);
    let mut rhs = vec![0u64; n];
    s.add(&lhs, &tmp, &mut rhs);

    assert_eq!(sum, rhs);
}

#[test]
fn conjugate_invariant_round_trip() {
    let mut rng = StdRng::seed_from_u64(41);
    for (n, q) in [(8usize, 97u64), (16, 193), (64, 12289)] {
        let s = SubRing::new(n, q, NttKind::ConjugateInvariant).unwrap();
        assert_eq!(s.nth_root, 4 * n as u64);
        for _ in 0..20 {
            let p = random_row(&mut rng, n, q);
            let mut w = p.clone();
            s.ntt_inplace(&mut w);
            s.intt_inplace(&mut w);
            assert_eq!(w, p, "CI round trip failed for n={} q={}", n, q);
        }
    }
}

#[test]
fn conjugate_invariant_product() {
    // multiplication of conjugate-invariant embeddings in the 2N ring,
    // checked against a schoolbook reference on the embedded coefficients
    let (n, q) = (8usize, 97u64);
    let s = SubRing::new(n, q, NttKind::ConjugateInvariant).unwrap();
    let mut rng = StdRng::seed_from_u64(43);
    for _ in 0..10 {
        let a = random_row(&mut rng, n, q);
        let b = random_row(&mut rng, n, q);

        let mut am = vec![0u64; n];
        s.m_form(&a, &mut am);
        s.ntt_inplace(&mut am);
        let mut bt = b.clone();
        s.ntt_inplace(&mut bt);
        let mut c = vec![0u64; n];
        s.mul_coeffs_montgomery(&am, &bt, &mut c);
        s.intt_inplace(&mut c);

        let expect = ci_schoolbook(&a, &b, n, q);
        assert_eq!(c, expect);
    }
}

/// Embeds both operands as `a_0 + sum a_j (X^j - X^{2n-j})`, multiplies in
/// `Z_q[X]/(X^{2n}+1)`, and reads back the first half.
fn ci_schoolbook(a: &[u64], b: &[u64], n: usize, q: u64) -> Vec<u64> {
    let embed = |v: &[u64]| {
        let mut e = vec![0u64; 2 * n];
        e[0] = v[0];
        for j in 1..n {
            e[j] = v[j];
            e[2 * n - j] = (q - v[j]) % q;
        }
        e
    };
    let (ea, eb) = (embed(a), embed(b));
    let mut prod = vec![0u64; 2 * n];
    for (i, &ai) in ea.iter().enumerate() {
        for (j, &bj) in eb.iter().enumerate() {
            let v = ai as u128 * bj as u128 % q as u128;
            let k = i + j;
            if k >= 2 * n {
                prod[k - 2 * n] = ((prod[k - 2 * n] as u128 + q as u128 - v) % q as u128) as u64;
            } else {
                prod[k] = ((prod[k] as u128 + v) % q as u128) as u64;
            }
        }
    }
    prod.truncate(n);
    prod
}
