//! CLI command implementations

pub mod presets;
pub mod simulate;
pub mod text;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use vortex_core::Result as VortexResult;
use vortex_particles::{
    presets as builtin, ParticleSimulation, ParticleView, TickReport, VortexConfig,
};
use vortex_runtime::{run_frames, GameClock, RuntimeSystem};

/// Resolve a preset name or a path to a TOML configuration
pub fn load_config(source: &str) -> Result<VortexConfig> {
    let path = Path::new(source);
    if path.extension().is_some_and(|ext| ext == "toml") || path.exists() {
        return VortexConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }
    builtin::by_name(source).with_context(|| {
        format!(
            "'{source}' is neither a file nor a preset (presets: {})",
            builtin::NAMES.join(", ")
        )
    })
}

/// Totals gathered while a simulation runs headlessly
#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub frames: u32,
    pub seconds: f64,
    pub births: usize,
    pub deaths: usize,
    pub bursts: usize,
    pub haptic_pulses: usize,
    pub exhausted: usize,
    pub peak_alive: usize,
    pub final_alive: usize,
}

impl RunStats {
    fn record(&mut self, report: &TickReport, alive: usize) {
        self.frames += 1;
        self.births += report.births;
        self.deaths += report.deaths;
        self.bursts += report.bursts;
        self.haptic_pulses += report.pulses.len();
        self.exhausted += report.exhausted.len();
        self.peak_alive = self.peak_alive.max(alive);
        self.final_alive = alive;
    }
}

/// Runtime system that steps a simulation and keeps per-frame totals
pub struct Headless {
    pub sim: ParticleSimulation,
    pub stats: RunStats,
}

impl Headless {
    pub fn new(sim: ParticleSimulation) -> Self {
        Self {
            sim,
            stats: RunStats::default(),
        }
    }

    /// Step `frames` frames at `fps` through the runtime frame driver
    pub fn run(&mut self, frames: u32, fps: f64) -> Result<()> {
        if !(fps > 0.0) {
            anyhow::bail!("fps must be positive, got {fps}");
        }
        let mut clock = GameClock::new();
        let system: &mut dyn RuntimeSystem = self;
        run_frames(&mut [system], &mut clock, frames, 1.0 / fps, |frame, clock| {
            log::trace!("frame {frame} at t={:.3}", clock.total_time);
        })?;
        Ok(())
    }
}

impl RuntimeSystem for Headless {
    fn initialize(&mut self) -> VortexResult<()> {
        self.sim.initialize()
    }

    fn fixed_update(&mut self, dt: f64) -> VortexResult<()> {
        self.sim.fixed_update(dt)
    }

    fn update(&mut self, dt: f64) -> VortexResult<()> {
        let report = self.sim.step(dt);
        self.stats.seconds += dt;
        self.stats.record(&report, self.sim.total_alive());
        Ok(())
    }

    fn shutdown(&mut self) -> VortexResult<()> {
        self.sim.shutdown()
    }

    fn name(&self) -> &str {
        "headless"
    }
}

#[derive(Serialize)]
struct Output<'a> {
    stats: &'a RunStats,
    particles: Vec<ParticleView<'a>>,
}

/// Print the outcome of a headless run as text or JSON
pub fn print_run(headless: &Headless, format: &str) -> Result<()> {
    let stats = &headless.stats;
    match format {
        "text" => {
            println!("Simulated {} frame(s), {:.2}s", stats.frames, stats.seconds);
            println!("  births:        {}", stats.births);
            println!("  deaths:        {}", stats.deaths);
            println!("  bursts:        {}", stats.bursts);
            println!("  haptic pulses: {}", stats.haptic_pulses);
            println!("  exhausted:     {}", stats.exhausted);
            println!("  peak alive:    {}", stats.peak_alive);
            println!("  alive at end:  {}", stats.final_alive);
        }
        "json" => {
            let output = Output {
                stats,
                particles: headless.sim.views().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_and_files_resolve() {
        assert!(load_config("fire").is_ok());
        assert!(load_config("no-such-effect").is_err());
        assert!(load_config("missing.toml").is_err());

        let path = std::env::temp_dir().join("vortex-cli-load-config.toml");
        std::fs::write(&path, "birth_rate = 12.0\nlifespan = 3.0\n").unwrap();
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.birth_rate, 12.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn headless_run_collects_stats() {
        let mut sim = ParticleSimulation::new(1);
        sim.add_config(VortexConfig {
            birth_rate: 30.0,
            lifespan: 0.5,
            ..Default::default()
        });
        let mut headless = Headless::new(sim);
        headless.run(60, 60.0).unwrap();

        let stats = &headless.stats;
        assert_eq!(stats.frames, 60);
        assert!((29..=30).contains(&stats.births));
        assert!(stats.deaths > 0);
        assert!(stats.peak_alive >= stats.final_alive);
        assert!(headless.run(1, 0.0).is_err());
    }
}
