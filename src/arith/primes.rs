//! Primality, primitive roots, and NTT-friendly prime generation
//!
//! NTT-friendly primes satisfy `q == 1 (mod nth_root)` so that Z_q carries a
//! primitive `nth_root`-th root of unity. The walkers step by `nth_root` to
//! preserve the congruence.

use crate::arith::modular::pow_mod;
use crate::errors::RingError;

/// Deterministic Miller-Rabin primality test, correct for all `u64` inputs.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    let r = (n - 1).trailing_zeros();
    let d = (n - 1) >> r;

    let witness = |a: u64| -> bool {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..r {
            x = ((x as u128 * x as u128) % n as u128) as u64;
            if x == n - 1 {
                return true;
            }
        }
        false
    };

    // Witness set sufficient for the full 64-bit range.
    [2u64, 325, 9_375, 28_178, 450_775, 9_780_504, 1_795_265_022]
        .iter()
        .all(|&a| witness(a))
}

fn binary_gcd(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            core::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            return a << shift;
        }
    }
}

/// Unique prime factors of `n` in ascending order.
///
/// Trial-divides small primes, then splits the remainder with Pollard's rho.
pub fn unique_prime_factors(mut n: u64) -> Vec<u64> {
    let mut res = Vec::new();
    if n == 0 {
        return res;
    }
    if n.trailing_zeros() > 0 {
        res.push(2);
        n >>= n.trailing_zeros();
    }
    for p in [3u64, 5, 7, 11, 13] {
        if n % p == 0 {
            res.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
    }
    if n == 1 {
        res.sort_unstable();
        return res;
    }

    let mut stack = vec![n];
    while let Some(m) = stack.pop() {
        if is_prime(m) {
            res.push(m);
            continue;
        }
        // Pollard rho with Floyd cycle detection; retry with a new offset
        // until a proper divisor splits off.
        'retry: for t in 1u64.. {
            let step = |x: u64| -> u64 { ((x as u128 * x as u128 + t as u128) % m as u128) as u64 };
            let mut x = t;
            let mut y = step(x);
            loop {
                let g = binary_gcd(y.wrapping_sub(x).wrapping_add(m) % m, m);
                if g == m || g == 0 {
                    break;
                }
                if g != 1 {
                    stack.push(g);
                    stack.push(m / g);
                    break 'retry;
                }
                x = step(x);
                y = step(step(y));
            }
        }
    }
    res.sort_unstable();
    res.dedup();
    res
}

/// Verifies that `factors` lists every unique prime factor of `n`.
pub fn check_factors(n: u64, factors: &[u64]) -> Result<(), RingError> {
    let mut rest = n;
    for &f in factors {
        if !is_prime(f) {
            return Err(RingError::CompositeFactor(f));
        }
        while f > 1 && rest % f == 0 {
            rest /= f;
        }
    }
    if rest != 1 {
        return Err(RingError::IncompleteFactorList(n));
    }
    Ok(())
}

/// Verifies that `g` generates `(Z/qZ)*`, given the unique prime factors
/// of `q-1`.
pub fn check_primitive_root(g: u64, q: u64, factors: &[u64]) -> Result<(), RingError> {
    check_factors(q - 1, factors)?;
    for &f in factors {
        if pow_mod(g, (q - 1) / f, q) == 1 {
            return Err(RingError::InvalidPrimitiveRoot { root: g, modulus: q });
        }
    }
    Ok(())
}

/// Smallest primitive root modulo the prime `q`, together with the unique
/// prime factors of `q-1`.
///
/// A supplied factor list skips the factorisation but is still validated.
pub fn primitive_root(q: u64, factors: Option<Vec<u64>>) -> Result<(u64, Vec<u64>), RingError> {
    let factors = match factors {
        Some(f) => {
            check_factors(q - 1, &f)?;
            f
        }
        None => unique_prime_factors(q - 1),
    };

    for g in 2..q {
        if factors.iter().all(|&f| pow_mod(g, (q - 1) / f, q) != 1) {
            return Ok((g, factors));
        }
    }
    Err(RingError::InvalidModulus {
        modulus: q,
        reason: "no primitive root found",
    })
}

/// Generates `n` distinct primes congruent to 1 mod `nth_root`, close to
/// `2^log_q`.
///
/// For `log_q <= 60` the search alternates upward and downward from
/// `2^log_q`; for `log_q == 61` it runs strictly downward from `2^61`.
pub fn generate_ntt_primes(log_q: usize, nth_root: u64, n: usize) -> Result<Vec<u64>, RingError> {
    assert!(log_q <= 61, "moduli are limited to 61 bits");
    assert!(nth_root.is_power_of_two());

    let exhausted = RingError::CannotGenerateEnoughPrimes {
        log_q,
        nth_root,
        wanted: n,
    };

    let center = 1u64 << log_q;
    let mut primes = Vec::with_capacity(n);

    let mut up = center + 1;
    let mut down = center + 1 - nth_root;
    let mut up_alive = log_q < 61;
    let mut down_alive = true;
    let mut toggle = false;

    while primes.len() < n {
        if !up_alive && !down_alive {
            return Err(exhausted);
        }
        toggle = !toggle;
        if toggle && up_alive {
            while !is_prime(up) {
                up += nth_root;
                if up >= center << 1 {
                    up_alive = false;
                    break;
                }
            }
            if up_alive {
                primes.push(up);
                up += nth_root;
            }
        } else if down_alive {
            while !is_prime(down) {
                if down < (center >> 1) + nth_root {
                    down_alive = false;
                    break;
                }
                down -= nth_root;
            }
            if down_alive {
                primes.push(down);
                down -= nth_root;
            }
        }
    }
    Ok(primes)
}

/// Smallest prime `> q` congruent to 1 mod `nth_root`.
pub fn next_ntt_prime(q: u64, nth_root: u64) -> Result<u64, RingError> {
    let mut cand = q + nth_root;
    while !is_prime(cand) {
        cand = cand
            .checked_add(nth_root)
            .ok_or(RingError::NextNttPrimeExceeds61Bits(q))?;
        if cand > 1u64 << 61 {
            return Err(RingError::NextNttPrimeExceeds61Bits(q));
        }
    }
    if cand > 1u64 << 61 {
        return Err(RingError::NextNttPrimeExceeds61Bits(q));
    }
    Ok(cand)
}

/// Largest prime `< q` congruent to 1 mod `nth_root`.
pub fn previous_ntt_prime(q: u64, nth_root: u64) -> Result<u64, RingError> {
    let mut cand = q;
    loop {
        if cand <= nth_root {
            return Err(RingError::PreviousNttPrimeBelowRoot(q));
        }
        cand -= nth_root;
        if is_prime(cand) {
            return Ok(cand);
        }
    }
}
