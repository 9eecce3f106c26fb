//! Vortex Runtime - Host loop infrastructure
//!
//! Provides the building blocks a host uses to drive particle simulations:
//! - `GameClock` - frame delta tracking, real-time or stepped headlessly
//! - `EventBus` - typed event queue drained by the host once per frame
//! - `RuntimeSystem` - trait for systems ticked by the host loop

mod clock;
mod event_bus;
mod system;

pub use clock::GameClock;
pub use event_bus::EventBus;
pub use system::{run_frames, RuntimeSystem};
