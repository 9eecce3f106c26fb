//! Particle system identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYSTEM: AtomicU64 = AtomicU64::new(1);

/// Names one particle system for as long as the process runs.
///
/// Systems are stored by value inside their parents, so the id is what hosts
/// hold on to when they need to find a system again (for a burst, a config
/// change, or to route a haptic pulse back to its source). Ids are never
/// reused; zero is never handed out.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u64);

impl SystemId {
    /// Mint the next id
    pub fn new() -> Self {
        Self(NEXT_SYSTEM.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a known value, e.g. one a host stored earlier
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for SystemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemId({})", self.0)
    }
}

/// Short form used in log lines: `#7`
impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
