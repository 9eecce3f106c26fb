//! Value-over-lifetime interpolation: color ramps and size curves

use crate::random;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vortex_core::{Color, Result, VortexError};

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two RGBA colors
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        lerp_f32(a.r, b.r, t),
        lerp_f32(a.g, b.g, t),
        lerp_f32(a.b, b.b, t),
        lerp_f32(a.a, b.a, t),
    )
}

/// Size at `fraction` of a particle's life: `base` at birth, growing or
/// shrinking linearly to `base * death_multiplier` at death.
pub fn size_at(base: f64, fraction: f64, death_multiplier: f64) -> f64 {
    let t = fraction.clamp(0.0, 1.0);
    base + (base * death_multiplier - base) * t
}

/// An ordered, non-empty sequence of color stops spread evenly over a
/// particle's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorRamp {
    stops: Vec<Color>,
}

impl ColorRamp {
    pub fn new(stops: Vec<Color>) -> Result<Self> {
        if stops.is_empty() {
            return Err(VortexError::EmptyRamp);
        }
        Ok(Self { stops })
    }

    /// A ramp that holds one color for the whole life
    pub fn constant(color: Color) -> Self {
        Self { stops: vec![color] }
    }

    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Color at `fraction` of the particle's life, clamped to [0, 1].
    ///
    /// `fraction * (n - 1)` selects the segment and the blend weight inside
    /// it. The endpoints return the first and last stop exactly.
    pub fn evaluate(&self, fraction: f64) -> Color {
        let last = self.stops.len() - 1;
        if last == 0 || fraction <= 0.0 || fraction.is_nan() {
            return self.stops[0];
        }
        if fraction >= 1.0 {
            return self.stops[last];
        }

        let scaled = fraction * last as f64;
        let index = (scaled.floor() as usize).min(last - 1);
        let local = (scaled - index as f64) as f32;
        lerp_color(self.stops[index], self.stops[index + 1], local)
    }
}

impl TryFrom<Vec<Color>> for ColorRamp {
    type Error = VortexError;

    fn try_from(stops: Vec<Color>) -> Result<Self> {
        Self::new(stops)
    }
}

impl From<ColorRamp> for Vec<Color> {
    fn from(ramp: ColorRamp) -> Self {
        ramp.stops
    }
}

/// How a [`ColorSpec`] turns into a per-particle ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every particle gets the same constant color
    Single,
    /// Each particle picks one constant color from a palette
    Random,
    /// Every particle follows the same ramp
    Ramp,
    /// Each particle picks one ramp from several candidates
    RandomRamp,
}

/// The color configuration of a system.
///
/// Internally every mode is a non-empty list of candidate ramps; a particle
/// resolves one of them at birth and keeps it for life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpecDef", into = "ColorSpecDef")]
pub struct ColorSpec {
    mode: ColorMode,
    candidates: Vec<Arc<ColorRamp>>,
}

impl ColorSpec {
    pub fn single(color: Color) -> Self {
        Self {
            mode: ColorMode::Single,
            candidates: vec![Arc::new(ColorRamp::constant(color))],
        }
    }

    pub fn random(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(VortexError::EmptyRamp);
        }
        Ok(Self {
            mode: ColorMode::Random,
            candidates: colors
                .into_iter()
                .map(|c| Arc::new(ColorRamp::constant(c)))
                .collect(),
        })
    }

    pub fn ramp(stops: Vec<Color>) -> Result<Self> {
        Ok(Self {
            mode: ColorMode::Ramp,
            candidates: vec![Arc::new(ColorRamp::new(stops)?)],
        })
    }

    pub fn random_ramp(ramps: Vec<Vec<Color>>) -> Result<Self> {
        if ramps.is_empty() {
            return Err(VortexError::EmptyRamp);
        }
        let candidates = ramps
            .into_iter()
            .map(|stops| ColorRamp::new(stops).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            mode: ColorMode::RandomRamp,
            candidates,
        })
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn candidates(&self) -> &[Arc<ColorRamp>] {
        &self.candidates
    }

    /// Choose the ramp one particle will carry for its whole life.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Arc<ColorRamp> {
        match random::pick(rng, &self.candidates) {
            Some(ramp) => Arc::clone(ramp),
            None => Arc::new(ColorRamp::constant(Color::WHITE)),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::single(Color::WHITE)
    }
}

/// Serialized shape of [`ColorSpec`]
#[derive(Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum ColorSpecDef {
    Single { color: Color },
    Random { colors: Vec<Color> },
    Ramp { stops: Vec<Color> },
    RandomRamp { ramps: Vec<Vec<Color>> },
}

impl TryFrom<ColorSpecDef> for ColorSpec {
    type Error = VortexError;

    fn try_from(def: ColorSpecDef) -> Result<Self> {
        match def {
            ColorSpecDef::Single { color } => Ok(Self::single(color)),
            ColorSpecDef::Random { colors } => Self::random(colors),
            ColorSpecDef::Ramp { stops } => Self::ramp(stops),
            ColorSpecDef::RandomRamp { ramps } => Self::random_ramp(ramps),
        }
    }
}

impl From<ColorSpec> for ColorSpecDef {
    fn from(spec: ColorSpec) -> Self {
        let mut ramps = spec.candidates.iter().map(|r| r.stops().to_vec());
        match spec.mode {
            ColorMode::Single => ColorSpecDef::Single {
                color: spec.candidates[0].stops()[0],
            },
            ColorMode::Random => ColorSpecDef::Random {
                colors: spec.candidates.iter().map(|r| r.stops()[0]).collect(),
            },
            ColorMode::Ramp => ColorSpecDef::Ramp {
                stops: ramps.next().unwrap_or_default(),
            },
            ColorMode::RandomRamp => ColorSpecDef::RandomRamp {
                ramps: ramps.collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;

    #[test]
    fn lerp_f32_endpoints() {
        assert!((lerp_f32(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_color_midpoint() {
        let mid = lerp_color(Color::WHITE, Color::CLEAR, 0.5);
        for c in mid.to_array() {
            assert!((c - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn ramp_endpoints_are_exact() {
        let ramp = ColorRamp::new(vec![
            Color::new(0.1, 0.2, 0.3, 1.0),
            Color::RED,
            Color::new(0.7, 0.3, 0.9, 0.0),
        ])
        .unwrap();
        assert_eq!(ramp.evaluate(0.0), ramp.stops()[0]);
        assert_eq!(ramp.evaluate(1.0), ramp.stops()[2]);
        assert_eq!(ramp.evaluate(-3.0), ramp.stops()[0]);
        assert_eq!(ramp.evaluate(7.0), ramp.stops()[2]);
    }

    #[test]
    fn ramp_evaluation_is_pure() {
        let ramp = ColorRamp::new(vec![Color::WHITE, Color::BLUE, Color::CLEAR]).unwrap();
        for i in 0..=20 {
            let f = i as f64 / 20.0;
            assert_eq!(ramp.evaluate(f), ramp.evaluate(f));
        }
    }

    #[test]
    fn ramp_segments_blend() {
        let ramp = ColorRamp::new(vec![Color::BLACK, Color::WHITE, Color::BLACK]).unwrap();
        // Middle stop sits exactly at half life
        assert!((ramp.evaluate(0.5).r - 1.0).abs() < 1e-6);
        // Quarter life is halfway through the first segment
        assert!((ramp.evaluate(0.25).r - 0.5).abs() < 1e-6);
        assert!((ramp.evaluate(0.75).r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn single_stop_is_constant() {
        let ramp = ColorRamp::constant(Color::ORANGE);
        assert_eq!(ramp.evaluate(0.0), Color::ORANGE);
        assert_eq!(ramp.evaluate(0.4), Color::ORANGE);
        assert_eq!(ramp.evaluate(1.0), Color::ORANGE);
    }

    #[test]
    fn empty_ramps_are_rejected() {
        assert!(matches!(ColorRamp::new(vec![]), Err(VortexError::EmptyRamp)));
        assert!(ColorSpec::random(vec![]).is_err());
        assert!(ColorSpec::random_ramp(vec![]).is_err());
        assert!(ColorSpec::random_ramp(vec![vec![Color::RED], vec![]]).is_err());
    }

    #[test]
    fn size_curve_interpolates_to_death_multiplier() {
        assert_eq!(size_at(2.0, 0.0, 0.0), 2.0);
        assert_eq!(size_at(2.0, 1.0, 0.0), 0.0);
        assert!((size_at(2.0, 0.5, 3.0) - 4.0).abs() < 1e-12);
        assert_eq!(size_at(2.0, 0.7, 1.0), 2.0);
        assert_eq!(size_at(2.0, 4.0, 0.5), 1.0);
    }

    #[test]
    fn random_ramp_resolves_to_a_candidate() {
        let spec = ColorSpec::random_ramp(vec![
            vec![Color::WHITE, Color::PINK],
            vec![Color::WHITE, Color::CYAN],
        ])
        .unwrap();
        let mut rng = seeded(5);
        let mut seen = [false; 2];
        for _ in 0..100 {
            let ramp = spec.resolve(&mut rng);
            let idx = spec
                .candidates()
                .iter()
                .position(|c| Arc::ptr_eq(c, &ramp))
                .unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn color_spec_toml_round_trip_keeps_mode() {
        let toml_str = r#"
mode = "random_ramp"
ramps = [
    [{ r = 1.0, g = 1.0, b = 1.0, a = 1.0 }, { r = 1.0, g = 0.0, b = 0.0, a = 0.0 }],
    [{ r = 0.0, g = 0.0, b = 1.0, a = 1.0 }],
]
"#;
        let spec: ColorSpec = toml::from_str(toml_str).unwrap();
        assert_eq!(spec.mode(), ColorMode::RandomRamp);
        assert_eq!(spec.candidates().len(), 2);
        assert_eq!(spec.candidates()[0].stops()[1], Color::new(1.0, 0.0, 0.0, 0.0));

        let empty = r#"
mode = "ramp"
stops = []
"#;
        assert!(toml::from_str::<ColorSpec>(empty).is_err());
    }
}
