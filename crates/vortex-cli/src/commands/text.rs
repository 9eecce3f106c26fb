//! Text fireworks: one staggered explosion per character

use super::{print_run, Headless};
use anyhow::Result;
use vortex_particles::presets::{text_fireworks, TextFireworks};
use vortex_particles::{LogHaptics, ParticleSimulation};

pub struct TextArgs {
    pub text: String,
    pub frames: u32,
    pub fps: f64,
    pub seed: u64,
    pub spacing: f64,
    pub delay: f64,
    pub format: String,
}

pub fn run(args: TextArgs) -> Result<()> {
    let layout = TextFireworks {
        letter_spacing: args.spacing,
        delay: args.delay,
        ..Default::default()
    };
    let configs = text_fireworks(&args.text, layout)?;
    if configs.is_empty() {
        println!("Nothing to explode in {:?}", args.text);
        return Ok(());
    }

    let mut sim = ParticleSimulation::new(args.seed);
    sim.set_haptics(Box::new(LogHaptics::default()));
    for config in configs {
        sim.add_config(config);
    }
    log::info!("{} letter(s) queued", sim.systems().len());

    let mut headless = Headless::new(sim);
    headless.run(args.frames, args.fps)?;
    print_run(&headless, &args.format)
}
