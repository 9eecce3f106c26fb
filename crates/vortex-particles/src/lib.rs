//! Vortex Particles - real-time 2D particle simulation
//!
//! Provides the simulation core of the engine:
//! - Configurable emitters with continuous, burst, and event-driven emission
//! - Swap-remove particle pool with color ramps and size curves over lifetime
//! - Secondary systems fed by their parent's births, updates, deaths, and bursts
//! - Throttled haptic pulses and renderer views, both pulled by the host

pub mod curves;
pub mod emitter;
pub mod haptics;
pub mod inject;
pub mod particle;
pub mod presets;
pub mod random;
pub mod render;
pub mod scheduler;
pub mod system;

use rand::Rng;
use vortex_core::{Result, SystemId, Vec2, VortexError};
use vortex_runtime::{EventBus, RuntimeSystem};

pub use curves::{ColorMode, ColorRamp, ColorSpec};
pub use emitter::{EmissionShape, SpawnOccasion, VortexConfig};
pub use haptics::{
    HapticPulse, HapticTrigger, HapticType, HapticsConfig, HapticsDispatcher, HapticsStrength,
    LogHaptics, NullHaptics,
};
pub use inject::DEFAULT_INJECTION_CAP;
pub use particle::{Particle, ParticleInstance, ParticlePool};
pub use random::{seeded, ParticleRng};
pub use render::{InstanceBuffer, ParticleBatch, ParticleView};
pub use system::{SystemState, TickReport, VortexSystem};

/// Notable things that happened during a simulation step
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A pulse was produced (whether or not the dispatcher accepted it)
    Haptic(HapticPulse),
    /// A system ran out of emission budget
    EmissionExhausted(SystemId),
}

/// A set of independent root systems sharing one generator and one haptics
/// dispatcher. Implements `RuntimeSystem` for integration with a host loop.
pub struct ParticleSimulation<R: Rng = ParticleRng> {
    systems: Vec<VortexSystem>,
    rng: R,
    haptics: Box<dyn HapticsDispatcher>,
    events: EventBus<SimulationEvent>,
    instances: InstanceBuffer,
    elapsed: f64,
}

impl ParticleSimulation<ParticleRng> {
    /// Simulation with a seeded default generator and no haptics device
    pub fn new(seed: u64) -> Self {
        Self::with_rng(seeded(seed))
    }
}

impl Default for ParticleSimulation<ParticleRng> {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}

impl<R: Rng> ParticleSimulation<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            systems: Vec::new(),
            rng,
            haptics: Box::new(NullHaptics),
            events: EventBus::new(),
            instances: InstanceBuffer::new(),
            elapsed: 0.0,
        }
    }

    pub fn set_haptics(&mut self, dispatcher: Box<dyn HapticsDispatcher>) {
        self.haptics = dispatcher;
    }

    /// Add a root system, returning its id
    pub fn add(&mut self, system: VortexSystem) -> SystemId {
        let id = system.id();
        self.systems.push(system);
        id
    }

    pub fn add_config(&mut self, config: VortexConfig) -> SystemId {
        self.add(VortexSystem::new(config))
    }

    /// Find a root system or any descendant
    pub fn get(&self, id: SystemId) -> Option<&VortexSystem> {
        self.systems.iter().find_map(|s| s.find(id))
    }

    pub fn get_mut(&mut self, id: SystemId) -> Option<&mut VortexSystem> {
        self.systems.iter_mut().find_map(|s| s.find_mut(id))
    }

    /// Remove a root system along with its particles and children
    pub fn remove(&mut self, id: SystemId) -> Option<VortexSystem> {
        let index = self.systems.iter().position(|s| s.id() == id)?;
        Some(self.systems.remove(index))
    }

    pub fn systems(&self) -> &[VortexSystem] {
        &self.systems
    }

    /// Burst the system with `id`, returning the particles created
    pub fn burst(&mut self, id: SystemId) -> Result<usize> {
        let system = self
            .systems
            .iter_mut()
            .find_map(|s| s.find_mut(id))
            .ok_or(VortexError::SystemNotFound(id))?;
        Ok(system.burst(&mut self.rng))
    }

    /// Seed particles of system `id` at `points`
    pub fn inject_points(&mut self, id: SystemId, points: &[Vec2]) -> Result<usize> {
        let system = self
            .systems
            .iter_mut()
            .find_map(|s| s.find_mut(id))
            .ok_or(VortexError::SystemNotFound(id))?;
        Ok(system.inject_points(&mut self.rng, points))
    }

    /// Step every root system by `dt` and deliver their haptic pulses
    pub fn step(&mut self, dt: f64) -> TickReport {
        let mut total = TickReport::default();
        for system in &mut self.systems {
            let report = system.update(&mut self.rng, dt);
            total.births += report.births;
            total.deaths += report.deaths;
            total.bursts += report.bursts;
            total.pulses.extend(report.pulses);
            total.exhausted.extend(report.exhausted);
        }
        self.elapsed += dt.max(0.0);

        haptics::deliver(self.haptics.as_mut(), &total.pulses);
        for pulse in &total.pulses {
            self.events.push(SimulationEvent::Haptic(*pulse));
        }
        for id in &total.exhausted {
            self.events.push(SimulationEvent::EmissionExhausted(*id));
        }
        total
    }

    /// Live particles across every system
    pub fn total_alive(&self) -> usize {
        self.systems
            .iter()
            .map(VortexSystem::total_particle_count)
            .sum()
    }

    /// Views of every live particle, root systems in insertion order
    pub fn views(&self) -> impl Iterator<Item = ParticleView<'_>> + '_ {
        self.systems.iter().flat_map(VortexSystem::tree_views)
    }

    /// Repack the instance buffer from the current particle state
    pub fn pack_instances(&mut self) -> &InstanceBuffer {
        self.instances.clear();
        for system in &self.systems {
            self.instances.pack(system);
        }
        &self.instances
    }

    /// The buffer as of the last `pack_instances`
    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        self.events.drain()
    }

    /// Total seconds stepped
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn clear(&mut self) {
        self.systems.clear();
        self.instances.clear();
    }
}

impl<R: Rng> RuntimeSystem for ParticleSimulation<R> {
    fn initialize(&mut self) -> Result<()> {
        let count = self.systems.len();
        if count > 0 {
            log::info!("[particles] Simulating {count} system(s)");
        }
        Ok(())
    }

    fn fixed_update(&mut self, _dt: f64) -> Result<()> {
        // Particles are purely visual, no fixed-step needed
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        self.step(dt);
        self.pack_instances();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        log::debug!(
            "[particles] Shutting down with {} live particle(s)",
            self.total_alive()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vortex_runtime::{run_frames, GameClock};

    /// Records every pulse it is handed
    struct Recorder(Rc<RefCell<Vec<HapticType>>>);

    impl HapticsDispatcher for Recorder {
        fn dispatch(&mut self, kind: HapticType, _intensity: f64) -> Result<()> {
            self.0.borrow_mut().push(kind);
            Ok(())
        }
    }

    fn burst_only() -> VortexConfig {
        VortexConfig {
            spawn_occasion: SpawnOccasion::BurstOnly,
            burst_count: 25,
            lifespan: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn burst_by_id() {
        let mut sim = ParticleSimulation::new(1);
        let id = sim.add_config(burst_only());
        assert_eq!(sim.burst(id).unwrap(), 25);
        assert_eq!(sim.total_alive(), 25);

        let missing = SystemId::from_raw(u64::MAX);
        assert!(matches!(sim.burst(missing), Err(VortexError::SystemNotFound(_))));
    }

    #[test]
    fn secondary_systems_are_addressable() {
        let mut sim = ParticleSimulation::new(2);
        let root = sim.add_config(fireworks_like());
        let child = sim.get(root).unwrap().secondary_systems()[0].id();
        assert_eq!(sim.get(child).unwrap().id(), child);
        sim.get_mut(child).unwrap().set_birth_rate(5.0);
        assert_eq!(sim.get(child).unwrap().config().birth_rate, 5.0);

        assert!(sim.remove(child).is_none());
        assert!(sim.remove(root).is_some());
        assert!(sim.get(child).is_none());
    }

    fn fireworks_like() -> VortexConfig {
        VortexConfig {
            secondary_systems: vec![VortexConfig {
                spawn_occasion: SpawnOccasion::OnDeath,
                ..Default::default()
            }],
            ..burst_only()
        }
    }

    #[test]
    fn pulses_reach_the_dispatcher_and_event_bus() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sim = ParticleSimulation::new(3);
        sim.set_haptics(Box::new(Recorder(seen.clone())));
        let id = sim.add_config(VortexConfig {
            haptics: HapticsConfig::on_burst(HapticType::Success, 1.0),
            emission_limit: Some(25),
            ..burst_only()
        });

        sim.burst(id).unwrap();
        let report = sim.step(1.0 / 60.0);
        assert_eq!(report.pulses.len(), 1);
        assert_eq!(*seen.borrow(), vec![HapticType::Success]);

        let events = sim.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SimulationEvent::Haptic(p) if p.system == id));
        assert_eq!(events[1], SimulationEvent::EmissionExhausted(id));
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn failing_dispatcher_does_not_disturb_the_simulation() {
        let mut sim = ParticleSimulation::new(4);
        let id = sim.add_config(VortexConfig {
            haptics: HapticsConfig::on_burst(HapticType::Heavy, 1.0),
            ..burst_only()
        });
        sim.burst(id).unwrap();
        let report = sim.step(0.1);
        assert_eq!(report.pulses.len(), 1);
        assert_eq!(sim.total_alive(), 25);
    }

    #[test]
    fn runs_under_the_frame_driver() {
        let mut sim = ParticleSimulation::new(5);
        sim.add_config(VortexConfig {
            birth_rate: 60.0,
            lifespan: 10.0,
            ..Default::default()
        });
        let mut clock = GameClock::new();
        let mut frames = 0;
        run_frames(&mut [&mut sim], &mut clock, 60, 1.0 / 60.0, |_, _| frames += 1).unwrap();
        assert_eq!(frames, 60);
        assert!((sim.elapsed() - 1.0).abs() < 1e-9);
        assert!((59..=60).contains(&sim.total_alive()));
        assert_eq!(sim.instances().len(), sim.total_alive());
        assert_eq!(sim.views().count(), sim.total_alive());
    }

    #[test]
    fn injection_by_id() {
        let mut sim = ParticleSimulation::new(6);
        let id = sim.add_config(burst_only());
        let points = [Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.9)];
        assert_eq!(sim.inject_points(id, &points).unwrap(), 2);
        assert_eq!(sim.pack_instances().len(), 2);
    }
}
