//! Emitter configuration: what a system emits, where, and when

use crate::curves::ColorSpec;
use crate::haptics::HapticsConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::path::Path;
use std::sync::Arc;
use vortex_core::{Result, Vec2};

/// Tag used when a configuration lists none
pub const DEFAULT_TAG: &str = "circle";

/// Hard ceiling on `max_particles`
pub const MAX_PARTICLES_CEILING: usize = 100_000;

/// Region around the emitter position where particles are born
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmissionShape {
    #[default]
    Point,
    /// Axis-aligned rectangle centered on the emitter
    Box { width: f64, height: f64 },
    /// Filled disc
    Ellipse { radius: f64 },
    /// Circle outline
    Ring { radius: f64 },
}

impl EmissionShape {
    /// Random offset from the emitter position
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match *self {
            EmissionShape::Point => Vec2::ZERO,
            EmissionShape::Box { width, height } => {
                let x = (rng.gen::<f64>() - 0.5) * width;
                let y = (rng.gen::<f64>() - 0.5) * height;
                Vec2::new(x, y)
            }
            EmissionShape::Ellipse { radius } => {
                let theta = rng.gen::<f64>() * TAU;
                // sqrt keeps the disc uniformly filled instead of center-heavy
                let r = radius * rng.gen::<f64>().sqrt();
                Vec2::new(theta.cos() * r, theta.sin() * r)
            }
            EmissionShape::Ring { radius } => {
                let theta = rng.gen::<f64>() * TAU;
                Vec2::new(theta.cos() * radius, theta.sin() * radius)
            }
        }
    }
}

/// What makes a system emit.
///
/// Root systems use `Continuous` or `BurstOnly`. Secondary systems usually use
/// one of the event occasions, which tie their emission to their parent's
/// particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnOccasion {
    /// Emit `birth_rate` particles per second on the system's own schedule
    #[default]
    Continuous,
    /// Only emit when `burst()` is called
    BurstOnly,
    /// Once per parent particle birth, at the newborn's position
    OnBirth,
    /// Once per parent particle per tick, at its current position
    OnUpdate,
    /// Once per parent particle death, at the position it died
    OnDeath,
    /// Once per parent burst, at the parent emitter position
    OnBurst,
}

impl SpawnOccasion {
    /// True for occasions driven by a parent's particles
    pub fn is_event(self) -> bool {
        matches!(
            self,
            SpawnOccasion::OnBirth
                | SpawnOccasion::OnUpdate
                | SpawnOccasion::OnDeath
                | SpawnOccasion::OnBurst
        )
    }
}

/// Declarative description of one particle system.
///
/// Every field has a documented default so configurations can be written with
/// struct-update syntax or as sparse TOML tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VortexConfig {
    /// Asset names; each particle picks one at random. Default `["circle"]`.
    pub tags: Vec<Arc<str>>,
    /// Emitter position in unit space. Default center `(0.5, 0.5)`.
    pub position: Vec2,
    /// Default `Point`.
    pub shape: EmissionShape,
    /// Default `Continuous`.
    pub spawn_occasion: SpawnOccasion,
    /// Particles per second. Default 100.
    pub birth_rate: f64,
    /// Per-tick jitter applied to the rate. Default 0.
    pub birth_rate_variation: f64,
    /// Particles per burst. Default 100.
    pub burst_count: u32,
    /// Default 0.
    pub burst_count_variation: u32,
    /// Total particles the system may emit before `start()` refills it.
    /// Default `None` (unlimited).
    pub emission_limit: Option<u32>,
    /// Seconds of continuous emission before idling. Default `None` (forever).
    pub emission_duration: Option<f64>,
    /// Seconds to idle before emitting again. Default `None` (stop after
    /// `emission_duration`).
    pub idle_duration: Option<f64>,
    /// Seconds after activation before any emission. Default 0.
    pub start_time_offset: f64,
    /// Seconds. Default 1.
    pub lifespan: f64,
    /// Default 0.
    pub lifespan_variation: f64,
    /// Unit-space distance per second. Default 1.
    pub speed: f64,
    /// Default 0.
    pub speed_variation: f64,
    /// Launch heading in degrees, 0 = up, clockwise. Default 0.
    pub angle: f64,
    /// Full width of the launch cone in degrees. Default 0.
    pub angle_range: f64,
    /// Added to velocity every second. Default zero.
    pub acceleration: Vec2,
    /// Fraction of velocity removed per second. Default 0.
    pub damping_factor: f64,
    /// Point particles are pulled toward. Default `None`.
    pub attraction_center: Option<Vec2>,
    /// Default 0.
    pub attraction_strength: f64,
    /// Radians per second for each rotation component. Default zero.
    pub angular_speed: [f64; 3],
    /// Default zero.
    pub angular_speed_variation: [f64; 3],
    /// Default constant white.
    pub colors: ColorSpec,
    /// Default 1.
    pub size: f64,
    /// Default 0.
    pub size_variation: f64,
    /// Size at death relative to birth size. Default 1 (constant size).
    pub size_multiplier_at_death: f64,
    /// Default trigger `Never`.
    pub haptics: HapticsConfig,
    /// Safety cap on live particles. Default 10 000.
    pub max_particles: usize,
    /// Start emitting as soon as the system is built. Default true.
    pub autoplay: bool,
    /// Queue a burst whenever the system starts. Default false.
    pub burst_on_start: bool,
    /// Child systems triggered by this system's particles. Default none.
    pub secondary_systems: Vec<VortexConfig>,
}

impl Default for VortexConfig {
    fn default() -> Self {
        Self {
            tags: vec![Arc::from(DEFAULT_TAG)],
            position: Vec2::CENTER,
            shape: EmissionShape::Point,
            spawn_occasion: SpawnOccasion::Continuous,
            birth_rate: 100.0,
            birth_rate_variation: 0.0,
            burst_count: 100,
            burst_count_variation: 0,
            emission_limit: None,
            emission_duration: None,
            idle_duration: None,
            start_time_offset: 0.0,
            lifespan: 1.0,
            lifespan_variation: 0.0,
            speed: 1.0,
            speed_variation: 0.0,
            angle: 0.0,
            angle_range: 0.0,
            acceleration: Vec2::ZERO,
            damping_factor: 0.0,
            attraction_center: None,
            attraction_strength: 0.0,
            angular_speed: [0.0; 3],
            angular_speed_variation: [0.0; 3],
            colors: ColorSpec::default(),
            size: 1.0,
            size_variation: 0.0,
            size_multiplier_at_death: 1.0,
            haptics: HapticsConfig::default(),
            max_particles: 10_000,
            autoplay: true,
            burst_on_start: false,
            secondary_systems: Vec::new(),
        }
    }
}

impl VortexConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.clamped())
    }

    /// Read and parse a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builder-style tag replacement
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| Arc::from(*t)).collect();
        self
    }

    /// Clamp values that would make the simulation misbehave.
    ///
    /// Nothing here is an error: a degraded effect beats a stalled frame.
    /// Negative lifespans are left alone, those particles simply die on their
    /// first tick.
    pub fn clamped(mut self) -> Self {
        clamp_min(&mut self.birth_rate, "birth_rate");
        clamp_min(&mut self.birth_rate_variation, "birth_rate_variation");
        clamp_min(&mut self.lifespan_variation, "lifespan_variation");
        clamp_min(&mut self.speed_variation, "speed_variation");
        clamp_min(&mut self.size_variation, "size_variation");
        clamp_min(&mut self.damping_factor, "damping_factor");
        clamp_min(&mut self.start_time_offset, "start_time_offset");
        clamp_min(&mut self.haptics.minimum_interval, "haptics.minimum_interval");
        for (window, field) in [
            (&mut self.emission_duration, "emission_duration"),
            (&mut self.idle_duration, "idle_duration"),
        ] {
            if let Some(seconds) = window {
                clamp_min(seconds, field);
            }
        }
        for v in &mut self.angular_speed_variation {
            clamp_min(v, "angular_speed_variation");
        }
        if !(0.0..=1.0).contains(&self.haptics.intensity) {
            log::warn!(
                "haptics.intensity {} outside [0, 1], clamping",
                self.haptics.intensity
            );
            self.haptics.intensity = if self.haptics.intensity.is_nan() {
                0.0
            } else {
                self.haptics.intensity.clamp(0.0, 1.0)
            };
        }
        if self.max_particles > MAX_PARTICLES_CEILING {
            log::warn!(
                "max_particles {} above ceiling, using {MAX_PARTICLES_CEILING}",
                self.max_particles
            );
            self.max_particles = MAX_PARTICLES_CEILING;
        }
        if self.lifespan <= 0.0 {
            log::warn!("lifespan {} is not positive, particles will die on birth", self.lifespan);
        }
        self.secondary_systems = self
            .secondary_systems
            .into_iter()
            .map(VortexConfig::clamped)
            .collect();
        self
    }
}

fn clamp_min(value: &mut f64, field: &str) {
    if !(*value >= 0.0) {
        log::warn!("{field} {value} is negative or not a number, using 0");
        *value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::ColorMode;
    use crate::haptics::HapticTrigger;
    use crate::random::seeded;
    use vortex_core::Color;

    #[test]
    fn default_config_is_sane() {
        let config = VortexConfig::default();
        assert!(config.birth_rate > 0.0);
        assert!(config.lifespan > 0.0);
        assert!(config.max_particles > 0);
        assert_eq!(config.haptics.trigger, HapticTrigger::Never);
        assert_eq!(config.size_multiplier_at_death, 1.0);
        assert_eq!(&*config.tags[0], DEFAULT_TAG);
        assert!(config.emission_limit.is_none());
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
tags = ["spark"]
birth_rate = 50.0
emission_limit = 200
max_particles = 500
acceleration = { x = 0, y = 1.5 }
spawn_occasion = "burst_only"
shape = { kind = "ring", radius = 0.25 }

[colors]
mode = "ramp"
stops = [
    { r = 1.0, g = 1.0, b = 1.0, a = 1.0 },
    { r = 1.0, g = 0.5, b = 0.0, a = 0.0 },
]

[[secondary_systems]]
spawn_occasion = "on_death"
burst_count = 30
"#;
        let config = VortexConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(&*config.tags[0], "spark");
        assert!((config.birth_rate - 50.0).abs() < 1e-9);
        assert_eq!(config.emission_limit, Some(200));
        assert_eq!(config.max_particles, 500);
        assert!((config.acceleration.y - 1.5).abs() < 1e-9);
        assert_eq!(config.spawn_occasion, SpawnOccasion::BurstOnly);
        assert_eq!(config.shape, EmissionShape::Ring { radius: 0.25 });
        assert_eq!(config.colors.mode(), ColorMode::Ramp);
        assert_eq!(config.colors.candidates()[0].stops()[1], Color::new(1.0, 0.5, 0.0, 0.0));
        assert_eq!(config.secondary_systems.len(), 1);
        assert_eq!(config.secondary_systems[0].spawn_occasion, SpawnOccasion::OnDeath);
        // Unspecified child fields fall back to defaults
        assert!((config.secondary_systems[0].lifespan - 1.0).abs() < 1e-9);
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let config = VortexConfig {
            shape: EmissionShape::Box {
                width: 0.5,
                height: 0.1,
            },
            emission_limit: Some(10),
            colors: ColorSpec::random(vec![Color::RED, Color::BLUE]).unwrap(),
            secondary_systems: vec![VortexConfig {
                spawn_occasion: SpawnOccasion::OnUpdate,
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        let parsed = VortexConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn toml_files_load_and_missing_ones_fail() {
        let path = std::env::temp_dir().join("vortex-emitter-from-file.toml");
        std::fs::write(&path, "birth_rate = -3.0\nlifespan = 2.0\n").unwrap();
        let config = VortexConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.birth_rate, 0.0);
        assert_eq!(config.lifespan, 2.0);
        let _ = std::fs::remove_file(&path);

        let missing = VortexConfig::from_toml_file("/nonexistent/vortex.toml");
        assert!(matches!(missing, Err(vortex_core::VortexError::IoError(_))));
    }

    #[test]
    fn invalid_values_are_clamped() {
        let config = VortexConfig {
            birth_rate: -5.0,
            damping_factor: -1.0,
            speed_variation: f64::NAN,
            max_particles: usize::MAX,
            emission_duration: Some(-2.0),
            idle_duration: Some(f64::NAN),
            secondary_systems: vec![VortexConfig {
                birth_rate: -1.0,
                ..Default::default()
            }],
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.birth_rate, 0.0);
        assert_eq!(config.damping_factor, 0.0);
        assert_eq!(config.speed_variation, 0.0);
        assert_eq!(config.max_particles, MAX_PARTICLES_CEILING);
        assert_eq!(config.emission_duration, Some(0.0));
        assert_eq!(config.idle_duration, Some(0.0));
        assert_eq!(config.secondary_systems[0].birth_rate, 0.0);
    }

    #[test]
    fn shapes_sample_inside_their_bounds() {
        let mut rng = seeded(11);
        for _ in 0..500 {
            let p = EmissionShape::Box {
                width: 0.4,
                height: 0.2,
            }
            .sample(&mut rng);
            assert!(p.x.abs() <= 0.2 && p.y.abs() <= 0.1);

            let e = EmissionShape::Ellipse { radius: 0.3 }.sample(&mut rng);
            assert!(e.length() <= 0.3 + 1e-12);

            let r = EmissionShape::Ring { radius: 0.3 }.sample(&mut rng);
            assert!((r.length() - 0.3).abs() < 1e-9);
        }
        assert_eq!(EmissionShape::Point.sample(&mut rng), Vec2::ZERO);
    }

    #[test]
    fn event_occasions() {
        assert!(SpawnOccasion::OnDeath.is_event());
        assert!(SpawnOccasion::OnBurst.is_event());
        assert!(!SpawnOccasion::Continuous.is_event());
        assert!(!SpawnOccasion::BurstOnly.is_event());
    }
}
