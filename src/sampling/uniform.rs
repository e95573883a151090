//! Uniform sampler
//!
//! Draws `ceil(log2(q_i))` bits per coefficient and rejects until the value
//! falls below the prime.

use rand_core::RngCore;

use crate::arith::modular::m_form;
use crate::ring::{Poly, Ring};
use crate::sampling::{RandomBuffer, Sampler};

pub struct UniformSampler<'a, R: RngCore> {
    ring: &'a Ring,
    buf: RandomBuffer<R>,
    montgomery: bool,
}

impl<'a, R: RngCore> UniformSampler<'a, R> {
    pub fn new(source: R, ring: &'a Ring, montgomery: bool) -> Self {
        UniformSampler {
            ring,
            buf: RandomBuffer::new(source),
            montgomery,
        }
    }
}

impl<R: RngCore> Sampler for UniformSampler<'_, R> {
    fn read(&mut self, pol: &mut Poly) {
        for (i, s) in self.ring.active().iter().enumerate() {
            let q = s.modulus;
            let mask = (1u64 << (64 - q.leading_zeros())) - 1;
            for c in pol.coeffs[i].iter_mut() {
                let v = loop {
                    let v = self.buf.next_u64() & mask;
                    if v < q {
                        break v;
                    }
                };
                *c = if self.montgomery {
                    m_form(v, q, s.b_red_constant)
                } else {
                    v
                };
            }
        }
    }

    fn read_new(&mut self) -> Poly {
        let mut pol = self.ring.new_poly();
        self.read(&mut pol);
        pol
    }
}
