//! Haptic feedback configuration and the dispatcher contract.
//!
//! The core only decides *when* a pulse is due; delivering it is the host's
//! business. A system emits at most one pulse per tick, throttled by
//! `minimum_interval`, and dispatch failures never reach the simulation.

use serde::{Deserialize, Serialize};
use vortex_core::{Result, SystemId, VortexError};

/// Which occasion fires haptics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticTrigger {
    /// A particle was created this tick
    OnBirth,
    /// A particle died this tick
    OnDeath,
    /// The system burst this tick
    OnBurst,
    #[default]
    Never,
}

/// Kind of feedback requested from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticType {
    Light,
    #[default]
    Medium,
    Heavy,
    Soft,
    Rigid,
    Success,
    Warning,
    Error,
    Selection,
}

/// Per-system haptics settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub trigger: HapticTrigger,
    #[serde(rename = "type")]
    pub kind: HapticType,
    /// Strength in [0, 1]
    pub intensity: f64,
    /// Seconds that must pass between two pulses
    pub minimum_interval: f64,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            trigger: HapticTrigger::Never,
            kind: HapticType::Medium,
            intensity: 1.0,
            minimum_interval: 0.1,
        }
    }
}

impl HapticsConfig {
    pub fn new(trigger: HapticTrigger, kind: HapticType, intensity: f64, minimum_interval: f64) -> Self {
        Self {
            trigger,
            kind,
            intensity: intensity.clamp(0.0, 1.0),
            minimum_interval,
        }
    }

    /// Pulse whenever the system bursts
    pub fn on_burst(kind: HapticType, intensity: f64) -> Self {
        Self::new(HapticTrigger::OnBurst, kind, intensity, 0.1)
    }

    /// Pulse while particles are being born
    pub fn on_birth(kind: HapticType, intensity: f64) -> Self {
        Self::new(HapticTrigger::OnBirth, kind, intensity, 0.05)
    }

    /// Pulse while particles are dying
    pub fn on_death(kind: HapticType, intensity: f64) -> Self {
        Self::new(HapticTrigger::OnDeath, kind, intensity, 0.05)
    }

    pub fn is_enabled(&self) -> bool {
        self.trigger != HapticTrigger::Never
    }
}

/// Coarse presets for hosts that don't want to pick a type and intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticsStrength {
    Light,
    Medium,
    Heavy,
}

impl HapticsStrength {
    /// Burst-triggered config at this strength
    pub fn config(self) -> HapticsConfig {
        match self {
            HapticsStrength::Light => HapticsConfig::on_burst(HapticType::Light, 0.5),
            HapticsStrength::Medium => HapticsConfig::on_burst(HapticType::Medium, 1.0),
            HapticsStrength::Heavy => HapticsConfig::on_burst(HapticType::Heavy, 1.0),
        }
    }
}

/// Occasions seen during one tick, for matching against a trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOccasions {
    pub births: usize,
    pub deaths: usize,
    pub bursts: usize,
}

impl TickOccasions {
    pub fn matches(&self, trigger: HapticTrigger) -> bool {
        match trigger {
            HapticTrigger::OnBirth => self.births > 0,
            HapticTrigger::OnDeath => self.deaths > 0,
            HapticTrigger::OnBurst => self.bursts > 0,
            HapticTrigger::Never => false,
        }
    }
}

/// Remembers when a system last pulsed
#[derive(Debug, Clone, Copy, Default)]
pub struct HapticThrottle {
    last_fired: Option<f64>,
}

impl HapticThrottle {
    /// Returns true and records `now` if a pulse is allowed at `now`.
    pub fn try_fire(&mut self, config: &HapticsConfig, occasions: &TickOccasions, now: f64) -> bool {
        if !occasions.matches(config.trigger) {
            return false;
        }
        if let Some(last) = self.last_fired {
            if now - last < config.minimum_interval {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }

    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

/// One coalesced haptic request produced by a system tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HapticPulse {
    pub system: SystemId,
    pub kind: HapticType,
    pub intensity: f64,
}

/// Host-side sink for haptic pulses
pub trait HapticsDispatcher {
    fn dispatch(&mut self, kind: HapticType, intensity: f64) -> Result<()>;
}

/// Dispatcher for platforms without haptics
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHaptics;

impl HapticsDispatcher for NullHaptics {
    fn dispatch(&mut self, _kind: HapticType, _intensity: f64) -> Result<()> {
        Err(VortexError::HapticsUnavailable("no haptics device".into()))
    }
}

/// Dispatcher that writes pulses to the log, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHaptics {
    pub dispatched: u64,
}

impl HapticsDispatcher for LogHaptics {
    fn dispatch(&mut self, kind: HapticType, intensity: f64) -> Result<()> {
        self.dispatched += 1;
        log::info!("haptic pulse: {kind:?} at {intensity:.2}");
        Ok(())
    }
}

/// Deliver `pulses`, swallowing failures at the boundary.
///
/// Returns how many were accepted by the dispatcher.
pub fn deliver(dispatcher: &mut dyn HapticsDispatcher, pulses: &[HapticPulse]) -> usize {
    let mut delivered = 0;
    for pulse in pulses {
        match dispatcher.dispatch(pulse.kind, pulse.intensity) {
            Ok(()) => delivered += 1,
            Err(err) => log::debug!("haptics for system {} dropped: {err}", pulse.system),
        }
    }
    delivered
}
