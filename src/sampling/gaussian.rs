//! Truncated discrete Gaussian sampler
//!
//! Standard normals come from `rand_distr`'s ziggurat-backed
//! `StandardNormal`, drawn through the block-buffered byte source. Draws
//! beyond `bound` standard deviations are rejected; the rest are scaled by
//! sigma and the signed integer part is mapped into every residue row.

use rand::Rng;
use rand_core::RngCore;
use rand_distr::StandardNormal;
use subtle::{Choice, ConditionallySelectable};

use crate::arith::modular::c_red;
use crate::ring::{Poly, Ring};
use crate::sampling::{RandomBuffer, Sampler};

pub struct GaussianSampler<'a, R: RngCore> {
    ring: &'a Ring,
    buf: RandomBuffer<R>,
    sigma: f64,
    bound: u64,
}

impl<'a, R: RngCore> GaussianSampler<'a, R> {
    pub fn new(source: R, ring: &'a Ring, sigma: f64, bound: u64) -> Self {
        GaussianSampler {
            ring,
            buf: RandomBuffer::new(source),
            sigma,
            bound,
        }
    }
}

impl<R: RngCore> Sampler for GaussianSampler<'_, R> {
    fn read(&mut self, pol: &mut Poly) {
        let n = self.ring.n();
        let bound_sigmas = self.bound as f64;
        for j in 0..n {
            let norm: f64 = loop {
                let z: f64 = self.buf.sample(StandardNormal);
                if z.abs() <= bound_sigmas {
                    break z;
                }
            };
            let c = (norm * self.sigma).abs() as u64;
            let positive = Choice::from(u8::from(norm >= 0.0));
            for (i, s) in self.ring.active().iter().enumerate() {
                let q = s.modulus;
                let ci = c % q;
                let neg = c_red(q - ci, q);
                pol.coeffs[i][j] = u64::conditional_select(&neg, &ci, positive);
            }
        }
    }

    fn read_new(&mut self) -> Poly {
        let mut pol = self.ring.new_poly();
        self.read(&mut pol);
        pol
    }
}
