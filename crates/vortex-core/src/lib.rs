//! Vortex Core - Foundational types for the Vortex particle engine
//!
//! This crate provides the types every other Vortex crate depends on:
//! - `SystemId` - Stable particle system identifiers
//! - `Vec2`, `Color` - Unit-space geometry and RGBA colors
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{Result, VortexError};
pub use id::SystemId;
pub use types::{Color, Vec2};
