//! Frame clock driven by host timestamps

use std::time::Instant;

/// Longest frame delta the clock reports, so a stall (debugger, window drag)
/// does not release a wall of particles at once.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Turns host timestamps or explicit deltas into clamped frame deltas, and
/// meters out fixed steps for hosts that want them.
///
/// Display links hand out absolute timestamps rather than deltas; the clock
/// remembers the previous one so the first frame always has a zero delta.
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Sum of every reported delta, in seconds
    pub total_time: f64,
    /// Delta reported for the current frame
    pub delta_time: f64,
    /// Fixed step length (default 1/60 s)
    pub fixed_timestep: f64,
    /// Frames advanced so far
    pub frame: u64,
    accumulator: f64,
    last_host_time: Option<f64>,
    origin: Instant,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::with_fixed_timestep(60.0)
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose fixed step runs at `hz`
    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / hz,
            frame: 0,
            accumulator: 0.0,
            last_host_time: None,
            origin: Instant::now(),
        }
    }

    /// Advance to the wall clock, measured from when the clock was built
    pub fn tick(&mut self) {
        let now = self.origin.elapsed().as_secs_f64();
        self.advance_to(now);
    }

    /// Advance to host timestamp `host_time` (seconds on any monotonic
    /// clock). The first call only records the timestamp.
    pub fn advance_to(&mut self, host_time: f64) {
        let dt = match self.last_host_time {
            Some(last) => host_time - last,
            None => 0.0,
        };
        self.last_host_time = Some(host_time);
        self.advance(dt);
    }

    /// Advance by an explicit delta, for headless runs and tests.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt } else { 0.0 };
        self.delta_time = dt.clamp(0.0, MAX_FRAME_TIME);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
        self.frame += 1;
    }

    /// True while at least one fixed step is owed
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_host_timestamp_has_zero_delta() {
        let mut clock = GameClock::new();
        clock.advance_to(5_000.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 1);

        clock.advance_to(5_000.1);
        assert!((clock.delta_time - 0.1).abs() < 1e-9);
        assert!((clock.total_time - 0.1).abs() < 1e-9);
    }

    #[test]
    fn stalls_and_bad_deltas_are_clamped() {
        let mut clock = GameClock::new();
        clock.advance(0.1);
        clock.advance(5.0);
        clock.advance(-1.0);
        clock.advance(f64::NAN);
        assert!((clock.total_time - (0.1 + MAX_FRAME_TIME)).abs() < 1e-12);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 4);

        // Host clock going backwards is not a negative frame
        clock.advance_to(10.0);
        clock.advance_to(9.0);
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn fixed_steps_follow_accumulated_time() {
        let mut clock = GameClock::with_fixed_timestep(60.0);
        assert!(!clock.should_fixed_update());

        clock.advance(1.0 / 30.0);
        let mut steps = 0;
        while clock.should_fixed_update() {
            clock.consume_fixed_step();
            steps += 1;
        }
        assert!((1..=2).contains(&steps));
        assert!(!clock.should_fixed_update());
    }

    #[test]
    fn wall_clock_ticks_forward() {
        let mut clock = GameClock::new();
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame, 2);
        assert!(clock.total_time >= 0.0);
        assert!(clock.delta_time <= MAX_FRAME_TIME);
    }
}
