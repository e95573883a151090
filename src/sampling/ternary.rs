//! Ternary samplers
//!
//! `TernarySampler` draws coefficients from {-1, 0, 1} with `Pr(0) = p`;
//! `SparseTernarySampler` places exactly `hamming` signed ones at distinct
//! positions. Both can emit coefficients directly in Montgomery form.

use rand_core::RngCore;

use crate::ring::{Poly, Ring};
use crate::sampling::{RandomBuffer, Sampler};

fn signed_units(ring: &Ring, montgomery: bool) -> (Vec<u64>, Vec<u64>) {
    let one = ring
        .active()
        .iter()
        .map(|s| if montgomery { s.m_form_scalar(1) } else { 1 })
        .collect();
    let minus_one = ring
        .active()
        .iter()
        .map(|s| {
            if montgomery {
                s.m_form_scalar(s.modulus - 1)
            } else {
                s.modulus - 1
            }
        })
        .collect();
    (one, minus_one)
}

pub struct TernarySampler<'a, R: RngCore> {
    ring: &'a Ring,
    buf: RandomBuffer<R>,
    /// `floor(p * 2^64)`; a u64 draw below it maps to zero, so the bias
    /// against the requested `Pr(0) = p` is below 2^-63.
    threshold: u128,
    one: Vec<u64>,
    minus_one: Vec<u64>,
}

impl<'a, R: RngCore> TernarySampler<'a, R> {
    pub fn new(source: R, ring: &'a Ring, p: f64, montgomery: bool) -> Self {
        assert!((0.0..=1.0).contains(&p), "probability out of range");
        let (one, minus_one) = signed_units(ring, montgomery);
        TernarySampler {
            ring,
            buf: RandomBuffer::new(source),
            threshold: (p * (1u128 << 64) as f64) as u128,
            one,
            minus_one,
        }
    }
}

impl<R: RngCore> Sampler for TernarySampler<'_, R> {
    fn read(&mut self, pol: &mut Poly) {
        let n = self.ring.n();
        let level = self.ring.level();
        for j in 0..n {
            if (self.buf.next_u64() as u128) < self.threshold {
                for row in pol.coeffs[..=level].iter_mut() {
                    row[j] = 0;
                }
            } else if self.buf.next_byte() & 1 == 0 {
                for (i, row) in pol.coeffs[..=level].iter_mut().enumerate() {
                    row[j] = self.one[i];
                }
            } else {
                for (i, row) in pol.coeffs[..=level].iter_mut().enumerate() {
                    row[j] = self.minus_one[i];
                }
            }
        }
    }

    fn read_new(&mut self) -> Poly {
        let mut pol = self.ring.new_poly();
        self.read(&mut pol);
        pol
    }
}

pub struct SparseTernarySampler<'a, R: RngCore> {
    ring: &'a Ring,
    buf: RandomBuffer<R>,
    hamming: usize,
    one: Vec<u64>,
    minus_one: Vec<u64>,
}

impl<'a, R: RngCore> SparseTernarySampler<'a, R> {
    pub fn new(source: R, ring: &'a Ring, hamming: usize, montgomery: bool) -> Self {
        assert!(hamming <= ring.n(), "hamming weight exceeds ring degree");
        let (one, minus_one) = signed_units(ring, montgomery);
        SparseTernarySampler {
            ring,
            buf: RandomBuffer::new(source),
            hamming,
            one,
            minus_one,
        }
    }
}

impl<R: RngCore> Sampler for SparseTernarySampler<'_, R> {
    fn read(&mut self, pol: &mut Poly) {
        let n = self.ring.n();
        let level = self.ring.level();
        let mask = (n - 1) as u64;
        for row in pol.coeffs[..=level].iter_mut() {
            for c in row.iter_mut() {
                *c = 0;
            }
        }
        // N is a power of two, so masking the draw is unbiased
        let mut used = vec![false; n];
        let mut placed = 0;
        while placed < self.hamming {
            let idx = (self.buf.next_u64() & mask) as usize;
            if used[idx] {
                continue;
            }
            used[idx] = true;
            let units = if self.buf.next_byte() & 1 == 0 {
                &self.one
            } else {
                &self.minus_one
            };
            for (i, row) in pol.coeffs[..=level].iter_mut().enumerate() {
                row[idx] = units[i];
            }
            placed += 1;
        }
    }

    fn read_new(&mut self) -> Poly {
        let mut pol = self.ring.new_poly();
        self.read(&mut pol);
        pol
    }
}
