//! Emission scheduling: how many particles a system may create right now.
//!
//! Counting and charging are separate steps. `continuous`, `burst` and
//! `event` only compute how many particles are *wanted*; `grant` then
//! truncates to the remaining budget and the room left in the pool, and
//! charges only what was granted.

use crate::emitter::VortexConfig;
use crate::random;
use rand::Rng;

/// Per-system emission bookkeeping
#[derive(Debug, Clone, Default)]
pub struct EmissionScheduler {
    /// Fractional births carried between ticks
    carry: f64,
    /// Remaining budget, `None` when unlimited
    remaining: Option<u32>,
    /// Everything granted since the last reset
    emitted: u64,
}

impl EmissionScheduler {
    pub fn new(limit: Option<u32>) -> Self {
        Self {
            carry: 0.0,
            remaining: limit,
            emitted: 0,
        }
    }

    /// Refill the budget and drop the carry
    pub fn reset(&mut self, limit: Option<u32>) {
        *self = Self::new(limit);
    }

    /// Replace the budget without touching the carry
    pub fn set_limit(&mut self, limit: Option<u32>) {
        self.remaining = limit;
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Particles granted since the last reset
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Births wanted from continuous emission over `dt` seconds.
    ///
    /// `rate * dt` accumulates into a carry and only whole particles leave
    /// it, so uneven frame pacing neither loses nor invents particles. With a
    /// variation the rate is jittered once per call.
    pub fn continuous<R: Rng + ?Sized>(
        &mut self,
        rate: f64,
        variation: f64,
        dt: f64,
        rng: &mut R,
    ) -> u32 {
        if !(dt > 0.0) {
            return 0;
        }
        let rate = random::vary(rng, rate, variation).max(0.0);
        self.carry += rate * dt;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole.min(u32::MAX as f64) as u32
    }

    /// Births wanted from one burst, independent of time and of the carry
    pub fn burst<R: Rng + ?Sized>(&mut self, count: u32, variation: u32, rng: &mut R) -> u32 {
        random::vary_count(rng, count, variation)
    }

    /// Births wanted from one parent event.
    ///
    /// Systems with a burst count answer each event with a burst; the rest
    /// convert their rate into a per-event count over the tick's `dt`.
    pub fn event<R: Rng + ?Sized>(&mut self, config: &VortexConfig, dt: f64, rng: &mut R) -> u32 {
        if config.burst_count > 0 {
            self.burst(config.burst_count, config.burst_count_variation, rng)
        } else {
            self.continuous(config.birth_rate, config.birth_rate_variation, dt, rng)
        }
    }

    /// Charge up to `wanted` particles against the budget and `room` free pool
    /// slots. Returns how many may actually be created.
    pub fn grant(&mut self, wanted: u32, room: usize) -> u32 {
        let mut granted = wanted.min(room.min(u32::MAX as usize) as u32);
        if let Some(remaining) = self.remaining.as_mut() {
            granted = granted.min(*remaining);
            *remaining -= granted;
        }
        self.emitted += granted as u64;
        granted
    }
}
