//! Particle types: simulation state and GPU instance data

use crate::curves::{size_at, ColorRamp};
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use vortex_core::{Color, Vec2};

/// One simulated particle.
///
/// Times are on the owning system's local clock. Everything visual is derived
/// from the age fraction on demand, so the record never needs per-tick color
/// or size bookkeeping.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Name of the visual asset the renderer should draw
    pub tag: Arc<str>,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation state; only `angle[0]` drives 2D rotation (radians)
    pub angle: [f64; 3],
    /// Radians per second, per component of `angle`
    pub angular_speed: [f64; 3],
    pub birth_time: f64,
    /// Seconds; zero or negative means the particle is dead on arrival
    pub lifespan: f64,
    pub initial_size: f64,
    /// Ramp resolved at birth, shared with every particle that drew it
    pub color_ramp: Arc<ColorRamp>,
    pub death_size_multiplier: f64,
}

impl Particle {
    /// Seconds since birth
    pub fn age(&self, now: f64) -> f64 {
        now - self.birth_time
    }

    pub fn is_alive(&self, now: f64) -> bool {
        self.lifespan > 0.0 && self.age(now) < self.lifespan
    }

    /// Normalized age in [0, 1]
    pub fn age_fraction(&self, now: f64) -> f64 {
        if self.lifespan <= 0.0 {
            1.0
        } else {
            (self.age(now) / self.lifespan).clamp(0.0, 1.0)
        }
    }

    pub fn size_at(&self, now: f64) -> f64 {
        size_at(
            self.initial_size,
            self.age_fraction(now),
            self.death_size_multiplier,
        )
    }

    pub fn color_at(&self, now: f64) -> Color {
        self.color_ramp.evaluate(self.age_fraction(now))
    }
}

/// GPU instance data for one particle quad.
/// 32 bytes, 16-byte rows (2 x vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xy = position, z = size, w = rotation
    pub pos_size_rot: [f32; 4],
    /// Color with alpha
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle, now: f64) -> Self {
        Self {
            pos_size_rot: [
                p.position.x as f32,
                p.position.y as f32,
                p.size_at(now) as f32,
                p.angle[0] as f32,
            ],
            color: p.color_at(now).to_array(),
        }
    }
}

/// Contiguous particle storage with swap-remove for O(1) kill.
///
/// `capacity` is a safety ceiling, not a preallocation: spawning past it is
/// refused. Removal reorders survivors, so indices are only stable within a
/// single tick.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn alive_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Slots left before the capacity ceiling
    pub fn free(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    /// Add one particle. Returns false (and drops it) if the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Sweep the pool at time `now`: `on_death` sees every particle that is
    /// no longer alive just before it is swap-removed, `on_alive` sees every
    /// survivor. Returns the number removed.
    pub fn update_and_compact(
        &mut self,
        now: f64,
        mut on_death: impl FnMut(&Particle),
        mut on_alive: impl FnMut(&Particle),
    ) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_alive(now) {
                on_alive(&self.particles[i]);
                i += 1;
            } else {
                on_death(&self.particles[i]);
                self.particles.swap_remove(i);
                removed += 1;
                // Don't increment i, the swapped-in particle needs checking
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Access alive particles slice for reading
    pub fn alive_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Access alive particles mutably
    pub fn alive_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
