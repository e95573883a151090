//! Static NTT-friendly prime tables for higher layers
//!
//! All entries are congruent to 1 mod 2^17 and therefore usable for ring
//! degrees up to 2^16 (standard) or 2^15 (conjugate-invariant).

/// 60-bit NTT-friendly primes, descending from 2^60.
pub const QI60: [u64; 16] = [
    1152921504606584833,
    1152921504598720513,
    1152921504597016577,
    1152921504595968001,
    1152921504592822273,
    1152921504592429057,
    1152921504589938689,
    1152921504586530817,
    1152921504583647233,
    1152921504581419009,
    1152921504580894721,
    1152921504578666497,
    1152921504578273281,
    1152921504577748993,
    1152921504577486849,
    1152921504570802177,
];

/// 61-bit NTT-friendly primes, descending from 2^61.
pub const PI61: [u64; 16] = [
    2305843009211596801,
    2305843009210023937,
    2305843009208713217,
    2305843009202159617,
    2305843009201242113,
    2305843009200586753,
    2305843009196916737,
    2305843009195868161,
    2305843009195343873,
    2305843009191936001,
    2305843009188003841,
    2305843009186430977,
    2305843009185120257,
    2305843009179353089,
    2305843009176862721,
    2305843009175027713,
];
