//! `VortexSystem`: one emitter, its particles, its clock, and its children.
//!
//! A tick runs in a fixed order: emission, aging, death and update events,
//! removal, the secondary systems, then haptics. Children never see their
//! parent; the parent hands each child the event positions matching the
//! child's spawn occasion and steps it with the same delta.

use crate::curves::ColorSpec;
use crate::emitter::{SpawnOccasion, VortexConfig, DEFAULT_TAG};
use crate::haptics::{HapticPulse, HapticThrottle, HapticsConfig, TickOccasions};
use crate::particle::{Particle, ParticlePool};
use crate::random;
use crate::scheduler::EmissionScheduler;
use rand::Rng;
use std::sync::Arc;
use vortex_core::{SystemId, Vec2};

/// Lifecycle state of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Updates are no-ops; particles are kept but frozen
    Stopped,
    /// Clock runs, particles age, emission follows the schedule
    Emitting,
    /// Clock and budget frozen; particles kept but frozen
    Paused,
}

/// What happened during one `update`, summed over the system tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub births: usize,
    pub deaths: usize,
    pub bursts: usize,
    /// At most one per system
    pub pulses: Vec<HapticPulse>,
    /// Systems whose emission budget ran out this tick
    pub exhausted: Vec<SystemId>,
}

/// Parent particle positions gathered during a tick, keyed by occasion
#[derive(Debug, Clone, Default)]
struct SpawnEvents {
    births: Vec<Vec2>,
    updates: Vec<Vec2>,
    deaths: Vec<Vec2>,
    bursts: Vec<Vec2>,
}

impl SpawnEvents {
    fn for_occasion(&self, occasion: SpawnOccasion) -> &[Vec2] {
        match occasion {
            SpawnOccasion::OnBirth => &self.births,
            SpawnOccasion::OnUpdate => &self.updates,
            SpawnOccasion::OnDeath => &self.deaths,
            SpawnOccasion::OnBurst => &self.bursts,
            SpawnOccasion::Continuous | SpawnOccasion::BurstOnly => &[],
        }
    }

    fn is_empty(&self) -> bool {
        self.births.is_empty()
            && self.updates.is_empty()
            && self.deaths.is_empty()
            && self.bursts.is_empty()
    }

    fn clear(&mut self) {
        self.births.clear();
        self.updates.clear();
        self.deaths.clear();
        self.bursts.clear();
    }
}

/// Occasions at least one child listens to; positions are only collected
/// for these.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Listeners {
    birth: bool,
    update: bool,
    death: bool,
    burst: bool,
}

impl Listeners {
    fn of(children: &[VortexSystem]) -> Self {
        let mut listeners = Self::default();
        for child in children {
            match child.config.spawn_occasion {
                SpawnOccasion::OnBirth => listeners.birth = true,
                SpawnOccasion::OnUpdate => listeners.update = true,
                SpawnOccasion::OnDeath => listeners.death = true,
                SpawnOccasion::OnBurst => listeners.burst = true,
                SpawnOccasion::Continuous | SpawnOccasion::BurstOnly => {}
            }
        }
        listeners
    }
}

/// One particle emitter and the tree of secondary systems it drives
#[derive(Debug)]
pub struct VortexSystem {
    id: SystemId,
    /// Own configuration; `secondary_systems` is always empty here, the
    /// children below own theirs
    config: VortexConfig,
    state: SystemState,
    emitting: bool,
    pub(crate) pool: ParticlePool,
    pub(crate) scheduler: EmissionScheduler,
    /// Local clock, only advanced by active ticks
    clock: f64,
    activation_time: f64,
    last_host_time: Option<f64>,
    /// Bursts requested before the start offset elapsed
    pending_bursts: u32,
    /// Occasions since the last tick, for haptics and reporting
    occasions: TickOccasions,
    events: SpawnEvents,
    throttle: HapticThrottle,
    exhausted_reported: bool,
    children: Vec<VortexSystem>,
}

impl VortexSystem {
    /// Build a system and its secondary systems from `config`.
    ///
    /// Invalid values are clamped. With `autoplay` the system starts
    /// emitting immediately, otherwise it waits for `start()` or `burst()`.
    pub fn new(config: VortexConfig) -> Self {
        let mut config = config.clamped();
        let children = std::mem::take(&mut config.secondary_systems)
            .into_iter()
            .map(VortexSystem::new)
            .collect();

        let mut system = Self {
            id: SystemId::new(),
            pool: ParticlePool::new(config.max_particles),
            scheduler: EmissionScheduler::new(config.emission_limit),
            config,
            state: SystemState::Stopped,
            emitting: false,
            clock: 0.0,
            activation_time: 0.0,
            last_host_time: None,
            pending_bursts: 0,
            occasions: TickOccasions::default(),
            events: SpawnEvents::default(),
            throttle: HapticThrottle::default(),
            exhausted_reported: false,
            children,
        };
        if system.config.autoplay {
            system.activate();
        }
        system
    }

    // ── Lifecycle ──

    /// Mark this system and its children active and emitting, restarting
    /// the activation time, the emission budget and the haptic throttle.
    /// Existing particles are kept.
    pub fn start(&mut self) {
        self.activate();
        for child in &mut self.children {
            child.start();
        }
    }

    fn activate(&mut self) {
        self.state = SystemState::Emitting;
        self.emitting = true;
        self.activation_time = self.clock;
        self.scheduler.reset(self.config.emission_limit);
        self.throttle.reset();
        self.exhausted_reported = false;
        self.pending_bursts = u32::from(self.config.burst_on_start);
        log::debug!("system {} started at t={:.3}", self.id, self.clock);
    }

    /// Stop updating. Particles are kept, frozen, until `start()` or `clear()`.
    pub fn stop(&mut self) {
        if self.state != SystemState::Stopped {
            log::debug!("system {} stopped", self.id);
        }
        self.state = SystemState::Stopped;
    }

    /// Freeze the clock without touching particles or budget
    pub fn pause(&mut self) {
        if self.state == SystemState::Emitting {
            self.state = SystemState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == SystemState::Paused {
            self.state = SystemState::Emitting;
        }
    }

    /// Emit one burst of `burst_count ± burst_count_variation` particles now.
    ///
    /// Works in any state; a stopped system becomes active. An exhausted
    /// emission budget is re-armed for the burst, a partly used one is not
    /// refilled. During the start offset the burst is queued and fires on
    /// the first tick after the offset. Returns the particles created.
    pub fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.state == SystemState::Stopped {
            self.state = SystemState::Emitting;
            self.emitting = true;
        }
        if !self.offset_elapsed() {
            self.pending_bursts += 1;
            return 0;
        }
        self.fire_burst(rng)
    }

    /// Drop every particle in this system and its children
    pub fn clear(&mut self) {
        self.pool.clear();
        self.events.clear();
        for child in &mut self.children {
            child.clear();
        }
    }

    // ── Stepping ──

    /// Advance the system by `delta` seconds.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, delta: f64) -> TickReport {
        let mut report = TickReport::default();
        self.step(rng, delta, &[], &mut report);
        report
    }

    /// Advance the system to host time `host_time` (seconds on any
    /// monotonic clock). The first call only records the time.
    pub fn update_at<R: Rng + ?Sized>(&mut self, rng: &mut R, host_time: f64) -> TickReport {
        let delta = match self.last_host_time {
            Some(last) => host_time - last,
            None => 0.0,
        };
        self.last_host_time = Some(host_time);
        self.update(rng, delta)
    }

    fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        delta: f64,
        requests: &[Vec2],
        report: &mut TickReport,
    ) {
        if self.state != SystemState::Emitting {
            return;
        }
        if requests.is_empty() && self.is_idle() {
            return;
        }

        let delta = if delta.is_finite() && delta > 0.0 { delta } else { 0.0 };
        self.clock += delta;
        let now = self.clock;

        self.emit_phase(rng, delta, requests);

        let config = &self.config;
        for p in self.pool.alive_slice_mut() {
            if p.is_alive(now) {
                integrate(p, config, delta);
            }
        }

        let listeners = self.listeners();
        let SpawnEvents {
            updates, deaths, ..
        } = &mut self.events;
        let died = self.pool.update_and_compact(
            now,
            |p| {
                if listeners.death {
                    deaths.push(p.position);
                }
            },
            |p| {
                if listeners.update {
                    updates.push(p.position);
                }
            },
        );
        self.occasions.deaths += died;

        for child in &mut self.children {
            if child.state == SystemState::Stopped {
                continue;
            }
            let positions = self.events.for_occasion(child.config.spawn_occasion);
            child.step(rng, delta, positions, report);
        }
        self.events.clear();

        if self.config.haptics.is_enabled()
            && self
                .throttle
                .try_fire(&self.config.haptics, &self.occasions, now)
        {
            report.pulses.push(HapticPulse {
                system: self.id,
                kind: self.config.haptics.kind,
                intensity: self.config.haptics.intensity,
            });
        }
        if self.scheduler.is_exhausted() && !self.exhausted_reported {
            self.exhausted_reported = true;
            log::debug!("system {} exhausted its emission budget", self.id);
            report.exhausted.push(self.id);
        }
        report.births += self.occasions.births;
        report.deaths += self.occasions.deaths;
        report.bursts += self.occasions.bursts;
        log::trace!(
            "system {} t={now:.3}: +{} -{} alive {}",
            self.id,
            self.occasions.births,
            self.occasions.deaths,
            self.pool.alive_count()
        );
        self.occasions = TickOccasions::default();
    }

    fn emit_phase<R: Rng + ?Sized>(&mut self, rng: &mut R, delta: f64, requests: &[Vec2]) {
        if !self.offset_elapsed() {
            return;
        }

        while self.pending_bursts > 0 {
            self.pending_bursts -= 1;
            self.fire_burst(rng);
        }

        if self.config.spawn_occasion == SpawnOccasion::Continuous
            && self.emitting
            && self.emission_window_open()
        {
            let wanted = self.scheduler.continuous(
                self.config.birth_rate,
                self.config.birth_rate_variation,
                delta,
                rng,
            );
            self.emit(rng, wanted, self.config.position);
        }

        for &origin in requests {
            let wanted = self.scheduler.event(&self.config, delta, rng);
            self.emit(rng, wanted, origin);
        }
    }

    fn fire_burst<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.scheduler.is_exhausted() {
            self.scheduler.set_limit(self.config.emission_limit);
            self.exhausted_reported = false;
            log::debug!("system {} budget re-armed by burst", self.id);
        }
        let wanted = self.scheduler.burst(
            self.config.burst_count,
            self.config.burst_count_variation,
            rng,
        );
        let origin = self.config.position;
        let born = self.emit(rng, wanted, origin);
        self.occasions.bursts += 1;
        if self.listeners().burst {
            self.events.bursts.push(origin);
        }
        born
    }

    /// Grant and create up to `wanted` particles in the emission shape
    /// around `origin`.
    fn emit<R: Rng + ?Sized>(&mut self, rng: &mut R, wanted: u32, origin: Vec2) -> usize {
        if wanted == 0 {
            return 0;
        }
        let granted = self.scheduler.grant(wanted, self.pool.free());
        let listeners = self.listeners();
        for _ in 0..granted {
            let position = origin + self.config.shape.sample(rng);
            self.birth(rng, position, listeners);
        }
        granted as usize
    }

    pub(crate) fn listeners(&self) -> Listeners {
        Listeners::of(&self.children)
    }

    /// Create one particle at exactly `position`
    pub(crate) fn birth<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        position: Vec2,
        listeners: Listeners,
    ) {
        let particle = make_particle(&self.config, rng, position, self.clock);
        if self.pool.spawn(particle) {
            self.occasions.births += 1;
            if listeners.birth {
                self.events.births.push(position);
            }
        }
    }

    fn offset_elapsed(&self) -> bool {
        self.clock - self.activation_time >= self.config.start_time_offset
    }

    fn emission_window_open(&mut self) -> bool {
        let Some(duration) = self.config.emission_duration else {
            return true;
        };
        let t = self.clock - self.activation_time - self.config.start_time_offset;
        match self.config.idle_duration {
            Some(idle) if duration + idle > 0.0 => t % (duration + idle) < duration,
            // Zero-length cycle: the window never opens
            Some(_) => false,
            None => {
                if t < duration {
                    true
                } else {
                    log::debug!("system {} finished its emission window", self.id);
                    self.emitting = false;
                    false
                }
            }
        }
    }

    /// Nothing to emit, nothing alive, nothing pending, here or below
    fn is_idle(&self) -> bool {
        !self.emitting
            && self.pool.is_empty()
            && self.pending_bursts == 0
            && self.events.is_empty()
            && self.occasions == TickOccasions::default()
            && self.children.iter().all(VortexSystem::is_idle)
    }

    // ── Configuration ──

    pub fn id(&self) -> SystemId {
        self.id
    }

    /// This system's configuration; secondary systems are reached through
    /// [`secondary_systems`](Self::secondary_systems)
    pub fn config(&self) -> &VortexConfig {
        &self.config
    }

    /// Rebuild the full configuration tree, children included
    pub fn to_config(&self) -> VortexConfig {
        let mut config = self.config.clone();
        config.secondary_systems = self.children.iter().map(VortexSystem::to_config).collect();
        config
    }

    /// Edit the configuration in place. Values are re-clamped afterwards and
    /// any secondary systems added to the config become new children.
    pub fn configure(&mut self, edit: impl FnOnce(&mut VortexConfig)) {
        let mut config = std::mem::take(&mut self.config);
        edit(&mut config);
        let mut config = config.clamped();
        for child in std::mem::take(&mut config.secondary_systems) {
            self.children.push(VortexSystem::new(child));
        }
        if config.emission_limit != self.config.emission_limit {
            self.scheduler.set_limit(config.emission_limit);
        }
        self.pool.set_capacity(config.max_particles);
        self.config = config;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.config.position = position;
    }

    pub fn set_birth_rate(&mut self, rate: f64) {
        self.configure(|c| c.birth_rate = rate);
    }

    pub fn set_colors(&mut self, colors: ColorSpec) {
        self.config.colors = colors;
    }

    pub fn set_haptics(&mut self, haptics: HapticsConfig) {
        self.configure(|c| c.haptics = haptics);
    }

    /// Replace the emission limit and the remaining budget with it
    pub fn set_emission_limit(&mut self, limit: Option<u32>) {
        self.config.emission_limit = limit;
        self.scheduler.set_limit(limit);
    }

    /// Toggle continuous emission without stopping the clock
    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }

    /// Attach a new secondary system, returning its id
    pub fn add_secondary_system(&mut self, config: VortexConfig) -> SystemId {
        let child = VortexSystem::new(config);
        let id = child.id;
        self.children.push(child);
        id
    }

    pub fn secondary_systems(&self) -> &[VortexSystem] {
        &self.children
    }

    pub fn secondary_systems_mut(&mut self) -> &mut [VortexSystem] {
        &mut self.children
    }

    /// Find this system or a descendant by id
    pub fn find(&self, id: SystemId) -> Option<&VortexSystem> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: SystemId) -> Option<&mut VortexSystem> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    // ── Inspection ──

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SystemState::Stopped
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Local clock in seconds
    pub fn current_time(&self) -> f64 {
        self.clock
    }

    /// Local clock value of the last activation
    pub fn activation_time(&self) -> f64 {
        self.activation_time
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    pub fn particle_count(&self) -> usize {
        self.pool.alive_count()
    }

    /// Particles in this system and every descendant
    pub fn total_particle_count(&self) -> usize {
        self.pool.alive_count()
            + self
                .children
                .iter()
                .map(VortexSystem::total_particle_count)
                .sum::<usize>()
    }

    /// `None` when unlimited
    pub fn remaining_budget(&self) -> Option<u32> {
        self.scheduler.remaining()
    }

    /// Particles emitted since the last `start()`
    pub fn emitted(&self) -> u64 {
        self.scheduler.emitted()
    }
}

/// Sample a newborn from the configuration
fn make_particle<R: Rng + ?Sized>(
    config: &VortexConfig,
    rng: &mut R,
    position: Vec2,
    now: f64,
) -> Particle {
    let tag = random::pick(rng, &config.tags)
        .cloned()
        .unwrap_or_else(|| Arc::from(DEFAULT_TAG));
    let heading = random::vary(rng, config.angle, config.angle_range / 2.0).to_radians();
    let speed = random::vary(rng, config.speed, config.speed_variation);
    let angular_speed = std::array::from_fn(|i| {
        random::vary(
            rng,
            config.angular_speed[i],
            config.angular_speed_variation[i],
        )
    });

    Particle {
        tag,
        position,
        velocity: Vec2::from_heading(heading) * speed,
        angle: [0.0; 3],
        angular_speed,
        birth_time: now,
        lifespan: random::vary(rng, config.lifespan, config.lifespan_variation),
        initial_size: random::vary(rng, config.size, config.size_variation).max(0.0),
        color_ramp: config.colors.resolve(rng),
        death_size_multiplier: config.size_multiplier_at_death,
    }
}

/// Advance one live particle by `delta` seconds
fn integrate(p: &mut Particle, config: &VortexConfig, delta: f64) {
    p.velocity += config.acceleration * delta;
    if let Some(center) = config.attraction_center {
        p.velocity += (center - p.position) * (config.attraction_strength * delta);
    }
    if config.damping_factor > 0.0 {
        // Clamped at zero: heavy damping stops a particle, never reverses it
        p.velocity *= (1.0 - config.damping_factor * delta).max(0.0);
    }
    p.position += p.velocity * delta;
    for (angle, speed) in p.angle.iter_mut().zip(p.angular_speed) {
        *angle += speed * delta;
    }
}
