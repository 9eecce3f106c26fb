//! Seeding particles at arbitrary points, e.g. the outline of a glyph or
//! shape sampled by the host.

use crate::system::VortexSystem;
use rand::Rng;
use vortex_core::Vec2;

/// Most points a single injection turns into particles
pub const DEFAULT_INJECTION_CAP: usize = 2_000;

/// Every `ceil(len / cap)`-th point, so at most `cap` survive
pub fn downsample(points: &[Vec2], cap: usize) -> impl Iterator<Item = Vec2> + '_ {
    let stride = points.len().div_ceil(cap.max(1)).max(1);
    let take = if cap == 0 { 0 } else { points.len() };
    points[..take].iter().step_by(stride).copied()
}

impl VortexSystem {
    /// Create one particle at each point (down-sampled to
    /// [`DEFAULT_INJECTION_CAP`]). Returns how many were created.
    pub fn inject_points<R: Rng + ?Sized>(&mut self, rng: &mut R, points: &[Vec2]) -> usize {
        self.inject_points_capped(rng, points, DEFAULT_INJECTION_CAP)
    }

    /// Like [`inject_points`](Self::inject_points) with an explicit cap.
    ///
    /// Injected particles sample every attribute except position from the
    /// configuration, count as births, and are charged to the emission
    /// budget. The start offset and lifecycle state don't apply.
    pub fn inject_points_capped<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        points: &[Vec2],
        cap: usize,
    ) -> usize {
        let sampled: Vec<Vec2> = downsample(points, cap).collect();
        let wanted = u32::try_from(sampled.len()).unwrap_or(u32::MAX);
        let granted = self.scheduler.grant(wanted, self.pool.free()) as usize;
        if granted < sampled.len() {
            log::debug!(
                "system {}: injected {granted} of {} points",
                self.id(),
                sampled.len()
            );
        }
        let listeners = self.listeners();
        for &position in &sampled[..granted] {
            self.birth(rng, position, listeners);
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{SpawnOccasion, VortexConfig};
    use crate::random::seeded;

    fn line(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f64 / n as f64, 0.5)).collect()
    }

    fn quiet() -> VortexConfig {
        VortexConfig {
            spawn_occasion: SpawnOccasion::BurstOnly,
            lifespan: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn downsample_bounds() {
        assert_eq!(downsample(&line(10), 100).count(), 10);
        assert_eq!(downsample(&line(4000), 2000).count(), 2000);
        assert_eq!(downsample(&line(4001), 2000).count(), 1334);
        assert_eq!(downsample(&line(10), 0).count(), 0);
        assert_eq!(downsample(&[], 10).count(), 0);
    }

    #[test]
    fn injection_uses_given_positions() {
        let mut rng = seeded(1);
        let mut system = VortexSystem::new(VortexConfig {
            speed: 0.0,
            ..quiet()
        });
        let points = line(5);
        assert_eq!(system.inject_points(&mut rng, &points), 5);
        let mut xs: Vec<f64> = system.particles().iter().map(|p| p.position.x).collect();
        xs.sort_by(f64::total_cmp);
        let expected: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, expected);

        // Births are reported with the next tick
        let report = system.update(&mut rng, 0.01);
        assert_eq!(report.births, 5);
    }

    #[test]
    fn large_point_sets_are_capped() {
        let mut rng = seeded(2);
        let mut system = VortexSystem::new(quiet());
        assert_eq!(system.inject_points(&mut rng, &line(10_000)), DEFAULT_INJECTION_CAP);
        assert_eq!(system.particle_count(), DEFAULT_INJECTION_CAP);
    }

    #[test]
    fn injection_respects_budget_and_pool() {
        let mut rng = seeded(3);
        let mut system = VortexSystem::new(VortexConfig {
            emission_limit: Some(30),
            ..quiet()
        });
        assert_eq!(system.inject_points(&mut rng, &line(50)), 30);
        assert_eq!(system.remaining_budget(), Some(0));

        let mut small = VortexSystem::new(VortexConfig {
            max_particles: 8,
            ..quiet()
        });
        assert_eq!(small.inject_points(&mut rng, &line(50)), 8);
    }
}
