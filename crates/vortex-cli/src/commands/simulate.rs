//! Headless simulation of a single effect

use super::{load_config, print_run, Headless};
use anyhow::Result;
use vortex_particles::{LogHaptics, ParticleSimulation};

pub struct SimulateArgs {
    pub source: String,
    pub frames: u32,
    pub fps: f64,
    pub seed: u64,
    pub burst: bool,
    pub format: String,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = load_config(&args.source)?;

    let mut sim = ParticleSimulation::new(args.seed);
    sim.set_haptics(Box::new(LogHaptics::default()));
    let id = sim.add_config(config);
    if args.burst {
        let born = sim.burst(id)?;
        log::info!("burst created {born} particle(s)");
    }

    let mut headless = Headless::new(sim);
    headless.run(args.frames, args.fps)?;
    print_run(&headless, &args.format)
}
