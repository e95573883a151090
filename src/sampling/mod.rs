//! Coefficient samplers over the RNS layout
//!
//! Every sampler borrows a ring and a byte source, buffers random bytes in
//! blocks, and writes whole polynomials at the ring's level. Key material
//! should be fed from the full-entropy source, ephemeral draws from the
//! deterministic PRNG.

pub mod gaussian;
pub mod prng;
pub mod ternary;
pub mod uniform;


pub use gaussian::GaussianSampler;
pub use prng::ShakePrng;
pub use ternary::{SparseTernarySampler, TernarySampler};
pub use uniform::UniformSampler;

use rand_core::RngCore;

use crate::errors::RingError;
use crate::ring::{Poly, Ring};

/// Sampler parameter descriptors with a fixed one-byte-tag wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// Truncated discrete Gaussian; `bound` counts standard deviations.
    Gaussian { sigma: f64, bound: u64 },
    /// Ternary with `Pr(0) = p`, the remaining mass split evenly.
    UniformTernary { p: f64 },
    /// Exactly `hamming` non-zero coefficients.
    SparseTernary { hamming: u32 },
    /// Uniform over `[0, q_i)` per residue.
    Uniform,
}

impl Distribution {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Distribution::Gaussian { sigma, bound } => {
                let mut out = vec![0u8];
                out.extend_from_slice(&sigma.to_le_bytes());
                out.extend_from_slice(&bound.to_le_bytes());
                out
            }
            Distribution::UniformTernary { p } => {
                let mut out = vec![1u8];
                out.extend_from_slice(&p.to_le_bytes());
                out
            }
            Distribution::SparseTernary { hamming } => {
                let mut out = vec![2u8];
                out.extend_from_slice(&hamming.to_le_bytes());
                out
            }
            Distribution::Uniform => vec![3u8],
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, RingError> {
        let tag = *data
            .first()
            .ok_or(RingError::InvalidEncoding("empty distribution record"))?;
        let body = &data[1..];
        match tag {
            0 => {
                if body.len() < 16 {
                    return Err(RingError::InvalidEncoding("gaussian record truncated"));
                }
                let mut f = [0u8; 8];
                f.copy_from_slice(&body[..8]);
                let mut b = [0u8; 8];
                b.copy_from_slice(&body[8..16]);
                Ok(Distribution::Gaussian {
                    sigma: f64::from_le_bytes(f),
                    bound: u64::from_le_bytes(b),
                })
            }
            1 => {
                if body.len() < 8 {
                    return Err(RingError::InvalidEncoding("ternary record truncated"));
                }
                let mut f = [0u8; 8];
                f.copy_from_slice(&body[..8]);
                Ok(Distribution::UniformTernary {
                    p: f64::from_le_bytes(f),
                })
            }
            2 => {
                if body.len() < 4 {
                    return Err(RingError::InvalidEncoding("sparse ternary record truncated"));
                }
                let mut w = [0u8; 4];
                w.copy_from_slice(&body[..4]);
                Ok(Distribution::SparseTernary {
                    hamming: u32::from_le_bytes(w),
                })
            }
            3 => Ok(Distribution::Uniform),
            _ => Err(RingError::InvalidEncoding("unknown distribution tag")),
        }
    }
}

/// Anything that fills polynomials with fresh coefficients.
pub trait Sampler {
    fn read(&mut self, pol: &mut Poly);
    fn read_new(&mut self) -> Poly;
}

/// Builds the sampler matching a distribution descriptor.
pub fn new_sampler<'a, R: RngCore + 'a>(
    source: R,
    ring: &'a Ring,
    dist: &Distribution,
    montgomery: bool,
) -> Box<dyn Sampler + 'a> {
    match *dist {
        Distribution::Gaussian { sigma, bound } => {
            Box::new(GaussianSampler::new(source, ring, sigma, bound))
        }
        Distribution::UniformTernary { p } => {
            Box::new(TernarySampler::new(source, ring, p, montgomery))
        }
        Distribution::SparseTernary { hamming } => Box::new(SparseTernarySampler::new(
            source,
            ring,
            hamming as usize,
            montgomery,
        )),
        Distribution::Uniform => Box::new(UniformSampler::new(source, ring, montgomery)),
    }
}

/// Block-buffered byte source; refills from the underlying stream when a
/// draw would run past the end.
pub(crate) struct RandomBuffer<R: RngCore> {
    source: R,
    buf: Vec<u8>,
    ptr: usize,
}

impl<R: RngCore> RandomBuffer<R> {
    const BLOCK: usize = 512;

    pub(crate) fn new(source: R) -> Self {
        RandomBuffer {
            source,
            buf: vec![0u8; Self::BLOCK],
            ptr: Self::BLOCK,
        }
    }

    #[inline]
    fn refill(&mut self) {
        self.source.fill_bytes(&mut self.buf);
        self.ptr = 0;
    }

    pub(crate) fn next_byte(&mut self) -> u8 {
        if self.ptr >= self.buf.len() {
            self.refill();
        }
        let b = self.buf[self.ptr];
        self.ptr += 1;
        b
    }
}

impl<R: RngCore> RngCore for RandomBuffer<R> {
    fn next_u32(&mut self) -> u32 {
        if self.ptr + 4 > self.buf.len() {
            self.refill();
        }
        let mut w = [0u8; 4];
        w.copy_from_slice(&self.buf[self.ptr..self.ptr + 4]);
        self.ptr += 4;
        u32::from_le_bytes(w)
    }

    fn next_u64(&mut self) -> u64 {
        if self.ptr + 8 > self.buf.len() {
            self.refill();
        }
        let mut w = [0u8; 8];
        w.copy_from_slice(&self.buf[self.ptr..self.ptr + 8]);
        self.ptr += 8;
        u64::from_le_bytes(w)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
