//! Renderer-facing views of live particles.
//!
//! Two shapes are offered: `ParticleView` for hosts that draw particles one by
//! one (sprites, canvas, UI), and a packed `ParticleInstance` buffer for
//! instanced GPU draws. Both are derived from the particle's age at read time
//! and never mutate the simulation.

use crate::particle::{Particle, ParticleInstance};
use crate::system::VortexSystem;
use serde::Serialize;
use vortex_core::{Color, SystemId, Vec2};

/// Everything needed to draw one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView<'a> {
    /// Visual asset name
    pub tag: &'a str,
    pub position: Vec2,
    pub size: f64,
    /// Radians
    pub rotation: f64,
    pub color: Color,
    /// Same as `color.a`, for hosts that apply it separately
    pub opacity: f32,
}

impl<'a> ParticleView<'a> {
    pub fn from_particle(p: &'a Particle, now: f64) -> Self {
        let color = p.color_at(now);
        Self {
            tag: &p.tag,
            position: p.position,
            size: p.size_at(now),
            rotation: p.angle[0],
            color,
            opacity: color.a,
        }
    }
}

impl VortexSystem {
    /// Views of this system's own particles
    pub fn views(&self) -> impl Iterator<Item = ParticleView<'_>> + '_ {
        let now = self.current_time();
        self.particles()
            .iter()
            .map(move |p| ParticleView::from_particle(p, now))
    }

    /// Views of this system's particles followed by every descendant's
    pub fn tree_views(&self) -> Box<dyn Iterator<Item = ParticleView<'_>> + '_> {
        Box::new(
            self.views().chain(
                self.secondary_systems()
                    .iter()
                    .flat_map(VortexSystem::tree_views),
            ),
        )
    }
}

/// One system's slice of the instance buffer
#[derive(Debug)]
pub struct ParticleBatch<'a> {
    pub system: SystemId,
    pub instances: &'a [ParticleInstance],
}

/// Reusable instance buffer, packed once per frame
#[derive(Debug, Default)]
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
    /// (system, start, count)
    ranges: Vec<(SystemId, usize, usize)>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.ranges.clear();
    }

    /// Append `system` and its descendants; empty systems get no batch
    pub fn pack(&mut self, system: &VortexSystem) {
        let now = system.current_time();
        let start = self.instances.len();
        self.instances.extend(
            system
                .particles()
                .iter()
                .map(|p| ParticleInstance::from_particle(p, now)),
        );
        let count = self.instances.len() - start;
        if count > 0 {
            self.ranges.push((system.id(), start, count));
        }
        for child in system.secondary_systems() {
            self.pack(child);
        }
    }

    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn batches(&self) -> Vec<ParticleBatch<'_>> {
        self.ranges
            .iter()
            .map(|&(system, start, count)| ParticleBatch {
                system,
                instances: &self.instances[start..start + count],
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
