//! Random deviates used when particles are born.
//!
//! Every draw goes through a caller-supplied `Rng`, so a host can seed one
//! generator and get the same effect frame for frame.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Default generator for hosts that don't bring their own.
pub type ParticleRng = StdRng;

/// Seeded default generator
pub fn seeded(seed: u64) -> ParticleRng {
    StdRng::seed_from_u64(seed)
}

/// `value + uniform(-variation, +variation)`; a non-positive variation, or
/// one whose range overflows `f64`, leaves `value` untouched and draws nothing.
pub fn vary<R: Rng + ?Sized>(rng: &mut R, value: f64, variation: f64) -> f64 {
    if variation > 0.0 && (variation * 2.0).is_finite() {
        value + rng.gen_range(-variation..=variation)
    } else {
        value
    }
}

/// Integer counterpart of [`vary`], clamped so the result is never negative.
pub fn vary_count<R: Rng + ?Sized>(rng: &mut R, count: u32, variation: u32) -> u32 {
    if variation == 0 {
        return count;
    }
    let spread = variation as i64;
    let value = count as i64 + rng.gen_range(-spread..=spread);
    value.max(0) as u32
}

/// Float in [0, 1)
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniformly chosen element, or `None` for an empty slice
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    match items.len() {
        0 => None,
        1 => items.first(),
        _ => items.choose(rng),
    }
}
