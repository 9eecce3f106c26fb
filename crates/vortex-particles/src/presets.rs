//! Ready-made effects.
//!
//! Tags refer to the three stock assets hosts are expected to provide:
//! `circle`, `confetti` and `sparkle`. Coordinates are unit space with y
//! growing downwards, so positive y acceleration is gravity.

use crate::curves::ColorSpec;
use crate::emitter::{EmissionShape, SpawnOccasion, VortexConfig};
use crate::haptics::{HapticType, HapticsConfig};
use vortex_core::{Color, Result, Vec2, VortexError};

/// Every preset `by_name` knows
pub const NAMES: &[&str] = &[
    "confetti", "fire", "fireflies", "fireworks", "magic", "rain", "smoke", "snow", "spark",
    "splash",
];

/// Look up a preset by its lowercase name
pub fn by_name(name: &str) -> Result<VortexConfig> {
    match name {
        "confetti" => confetti(),
        "fire" => fire(),
        "fireflies" => fireflies(),
        "fireworks" => fireworks(),
        "magic" => magic(),
        "rain" => rain(),
        "smoke" => smoke(),
        "snow" => snow(),
        "spark" => spark(),
        "splash" => splash(),
        other => Err(VortexError::UnknownPreset(other.to_string())),
    }
}

/// Tumbling paper burst; call `burst()` to fire it
pub fn confetti() -> Result<VortexConfig> {
    Ok(VortexConfig {
        spawn_occasion: SpawnOccasion::BurstOnly,
        shape: EmissionShape::Box {
            width: 1.0,
            height: 0.0,
        },
        burst_count: 100,
        lifespan: 4.0,
        speed: 0.5,
        speed_variation: 0.5,
        angle_range: 90.0,
        acceleration: Vec2::new(0.0, 1.0),
        angular_speed_variation: [4.0, 4.0, 4.0],
        colors: ColorSpec::random(vec![
            Color::WHITE,
            Color::RED,
            Color::GREEN,
            Color::BLUE,
            Color::PINK,
            Color::ORANGE,
            Color::CYAN,
        ])?,
        size: 0.5,
        size_variation: 0.5,
        haptics: HapticsConfig::on_burst(HapticType::Light, 0.6),
        ..Default::default()
    }
    .with_tags(&["confetti"]))
}

pub fn fire() -> Result<VortexConfig> {
    Ok(VortexConfig {
        position: Vec2::new(0.5, 1.0),
        shape: EmissionShape::Box {
            width: 0.1,
            height: 0.0,
        },
        birth_rate: 300.0,
        lifespan: 1.0,
        speed: 0.0,
        speed_variation: 0.25,
        angle_range: 10.0,
        colors: ColorSpec::ramp(vec![
            Color::new(1.0, 0.2, 0.0, 0.0),
            Color::new(1.0, 0.4, 0.0, 0.6),
            Color::new(1.0, 0.9, 0.2, 0.4),
            Color::CLEAR,
        ])?,
        size: 0.25,
        size_variation: 0.5,
        size_multiplier_at_death: 0.3,
        ..Default::default()
    })
}

pub fn fireflies() -> Result<VortexConfig> {
    Ok(VortexConfig {
        shape: EmissionShape::Box {
            width: 1.0,
            height: 1.0,
        },
        birth_rate: 200.0,
        lifespan: 2.0,
        speed: 0.05,
        speed_variation: 0.05,
        angle_range: 360.0,
        colors: ColorSpec::ramp(vec![
            Color::CLEAR,
            Color::new(1.0, 1.0, 0.4, 0.8),
            Color::CLEAR,
        ])?,
        size: 0.01,
        size_variation: 0.02,
        ..Default::default()
    })
}

/// Rockets that trail sparkles and explode into colored shells
pub fn fireworks() -> Result<VortexConfig> {
    let sparkles = VortexConfig {
        spawn_occasion: SpawnOccasion::OnUpdate,
        burst_count: 1,
        lifespan: 0.5,
        speed: 0.05,
        angle_range: 90.0,
        size: 0.05,
        ..Default::default()
    };

    let explosion = VortexConfig {
        spawn_occasion: SpawnOccasion::OnDeath,
        burst_count: 150,
        burst_count_variation: 30,
        lifespan: 2.0,
        speed: 0.5,
        speed_variation: 1.0,
        angle_range: 360.0,
        acceleration: Vec2::new(0.0, 1.5),
        damping_factor: 4.0,
        colors: shell_colors()?,
        size: 0.15,
        size_variation: 0.1,
        size_multiplier_at_death: 0.0,
        haptics: HapticsConfig::on_birth(HapticType::Rigid, 0.7),
        ..Default::default()
    };

    Ok(VortexConfig {
        position: Vec2::new(0.5, 1.0),
        birth_rate: 2.0,
        lifespan: 1.2,
        speed: 1.5,
        speed_variation: 0.75,
        angle_range: 60.0,
        damping_factor: 2.0,
        size: 0.15,
        secondary_systems: vec![sparkles, explosion],
        ..Default::default()
    })
}

pub fn magic() -> Result<VortexConfig> {
    Ok(VortexConfig {
        shape: EmissionShape::Ring { radius: 0.5 },
        birth_rate: 40.0,
        lifespan: 2.0,
        speed: 0.0,
        angular_speed_variation: [0.0, 0.0, 3.0],
        colors: ColorSpec::random_ramp(vec![
            vec![Color::CLEAR, Color::PINK, Color::CLEAR],
            vec![Color::CLEAR, Color::CYAN, Color::CLEAR],
            vec![Color::CLEAR, Color::YELLOW, Color::CLEAR],
        ])?,
        size: 0.5,
        size_variation: 0.5,
        ..Default::default()
    }
    .with_tags(&["sparkle"]))
}

pub fn rain() -> Result<VortexConfig> {
    Ok(VortexConfig {
        position: Vec2::new(0.5, 0.0),
        shape: EmissionShape::Box {
            width: 1.8,
            height: 0.0,
        },
        birth_rate: 400.0,
        lifespan: 0.5,
        speed: 4.5,
        speed_variation: 2.0,
        angle: 190.0,
        colors: ColorSpec::random(vec![
            Color::new(0.7, 0.7, 1.0, 0.6),
            Color::new(0.7, 0.7, 1.0, 0.5),
            Color::new(0.7, 0.7, 1.0, 0.4),
        ])?,
        size: 0.09,
        size_variation: 0.05,
        ..Default::default()
    })
}

pub fn smoke() -> Result<VortexConfig> {
    Ok(VortexConfig {
        position: Vec2::new(0.5, 1.0),
        shape: EmissionShape::Box {
            width: 0.05,
            height: 0.0,
        },
        birth_rate: 200.0,
        lifespan: 3.0,
        speed: 0.1,
        speed_variation: 0.1,
        angle_range: 10.0,
        colors: ColorSpec::ramp(vec![
            Color::GRAY.with_alpha(0.0),
            Color::GRAY.with_alpha(0.3),
            Color::GRAY.with_alpha(0.3),
            Color::GRAY.with_alpha(0.0),
        ])?,
        size: 0.1,
        size_variation: 0.5,
        size_multiplier_at_death: 8.0,
        ..Default::default()
    })
}

pub fn snow() -> Result<VortexConfig> {
    Ok(VortexConfig {
        position: Vec2::new(0.5, 0.0),
        shape: EmissionShape::Box {
            width: 1.0,
            height: 0.0,
        },
        birth_rate: 50.0,
        lifespan: 10.0,
        speed: 0.2,
        speed_variation: 0.2,
        angle: 180.0,
        angle_range: 20.0,
        size: 0.25,
        size_variation: 0.5,
        ..Default::default()
    })
}

/// Short welding-style spurts on a cycle
pub fn spark() -> Result<VortexConfig> {
    Ok(VortexConfig {
        birth_rate: 150.0,
        emission_duration: Some(0.2),
        idle_duration: Some(0.5),
        lifespan: 1.5,
        speed: 1.25,
        speed_variation: 0.2,
        angle_range: 20.0,
        acceleration: Vec2::new(0.0, 3.0),
        colors: ColorSpec::ramp(vec![Color::WHITE, Color::YELLOW, Color::ORANGE.with_alpha(0.0)])?,
        size: 0.05,
        size_multiplier_at_death: 0.5,
        haptics: HapticsConfig::on_birth(HapticType::Light, 0.4),
        ..Default::default()
    })
}

pub fn splash() -> Result<VortexConfig> {
    Ok(VortexConfig {
        position: Vec2::new(0.5, 1.0),
        birth_rate: 60.0,
        emission_duration: Some(0.2),
        idle_duration: Some(1.0),
        burst_count: 20,
        lifespan: 0.8,
        speed: 0.4,
        speed_variation: 0.1,
        angle_range: 20.0,
        acceleration: Vec2::new(0.0, 1.0),
        colors: ColorSpec::random(vec![
            Color::new(0.7, 0.7, 1.0, 0.7),
            Color::new(0.7, 0.7, 1.0, 0.5),
        ])?,
        size: 0.2,
        size_variation: 0.1,
        size_multiplier_at_death: 0.4,
        ..Default::default()
    })
}

/// White flash fading into one of six shell colors
fn shell_colors() -> Result<ColorSpec> {
    ColorSpec::random_ramp(
        [
            Color::PINK,
            Color::BLUE,
            Color::GREEN,
            Color::ORANGE,
            Color::CYAN,
            Color::YELLOW,
        ]
        .into_iter()
        .map(|c| vec![Color::WHITE, c, c])
        .collect(),
    )
}

/// Layout of a `text_fireworks` line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFireworks {
    /// Horizontal distance between letters, unit space
    pub letter_spacing: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Seconds between consecutive letters exploding
    pub delay: f64,
}

impl Default for TextFireworks {
    fn default() -> Self {
        Self {
            letter_spacing: 0.08,
            start_x: 0.2,
            start_y: 0.5,
            delay: 0.15,
        }
    }
}

/// One explosion per character of `text`, left to right, each delayed a
/// little more than the one before. Spaces keep their slot but get no
/// explosion.
pub fn text_fireworks(text: &str, layout: TextFireworks) -> Result<Vec<VortexConfig>> {
    let colors = shell_colors()?;
    let configs = text
        .to_uppercase()
        .chars()
        .enumerate()
        .filter(|(_, c)| *c != ' ')
        .map(|(index, _)| {
            let index = index as f64;
            VortexConfig {
                position: Vec2::new(layout.start_x + index * layout.letter_spacing, layout.start_y),
                spawn_occasion: SpawnOccasion::BurstOnly,
                birth_rate: 0.0,
                burst_count: 200,
                burst_count_variation: 50,
                lifespan: 2.0,
                speed: 0.5,
                speed_variation: 1.0,
                angle_range: 360.0,
                acceleration: Vec2::new(0.0, 1.5),
                damping_factor: 4.0,
                colors: colors.clone(),
                size: 0.15,
                size_variation: 0.1,
                size_multiplier_at_death: 0.0,
                start_time_offset: index * layout.delay,
                haptics: HapticsConfig::on_burst(HapticType::Heavy, 0.8),
                burst_on_start: true,
                ..Default::default()
            }
        })
        .collect();
    Ok(configs)
}
