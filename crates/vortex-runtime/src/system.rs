//! Runtime system trait

use crate::clock::GameClock;
use vortex_core::Result;

/// A system that can be ticked by the host loop
///
/// Systems are updated in registration order. Fixed update runs at a constant
/// rate, while update runs once per rendered frame.
pub trait RuntimeSystem {
    /// Called once before the first frame
    fn initialize(&mut self) -> Result<()>;

    /// Called at a fixed rate (e.g. 60Hz) for deterministic simulation
    fn fixed_update(&mut self, dt: f64) -> Result<()>;

    /// Called once per frame for variable-rate logic
    fn update(&mut self, dt: f64) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}

/// Drive `systems` headlessly for `frames` frames of `dt` seconds each.
///
/// Runs the same sequence a windowed host would: one `update` per frame,
/// plus as many `fixed_update` calls as the clock's accumulator allows.
/// `on_frame` sees the clock after every frame.
pub fn run_frames(
    systems: &mut [&mut dyn RuntimeSystem],
    clock: &mut GameClock,
    frames: u32,
    dt: f64,
    mut on_frame: impl FnMut(u32, &GameClock),
) -> Result<()> {
    for system in systems.iter_mut() {
        system.initialize()?;
        log::debug!("initialized runtime system '{}'", system.name());
    }

    for frame in 0..frames {
        clock.advance(dt);
        while clock.should_fixed_update() {
            for system in systems.iter_mut() {
                system.fixed_update(clock.fixed_timestep)?;
            }
            clock.consume_fixed_step();
        }
        for system in systems.iter_mut() {
            system.update(clock.delta_time)?;
        }
        on_frame(frame, clock);
    }

    for system in systems.iter_mut() {
        system.shutdown()?;
    }
    Ok(())
}
