//! Error types for Vortex

use crate::id::SystemId;
use thiserror::Error;

/// The main error type for Vortex operations
///
/// The simulation itself never fails mid-tick; these errors surface at
/// construction time (ramps, configuration files) and at host boundaries.
#[derive(Debug, Error)]
pub enum VortexError {
    #[error("Color ramp must contain at least one stop")]
    EmptyRamp,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Particle system not found: {0}")]
    SystemNotFound(SystemId),

    #[error("Haptics unavailable: {0}")]
    HapticsUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Vortex operations
pub type Result<T> = std::result::Result<T, VortexError>;

impl From<toml::de::Error> for VortexError {
    fn from(err: toml::de::Error) -> Self {
        VortexError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for VortexError {
    fn from(err: toml::ser::Error) -> Self {
        VortexError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: VortexError = toml::from_str::<toml::Table>("= broken").unwrap_err().into();
        assert!(matches!(err, VortexError::TomlParseError(_)));
    }

    #[test]
    fn io_errors_convert() {
        let err: VortexError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(matches!(err, VortexError::IoError(_)));
    }

    #[test]
    fn display_mentions_system() {
        let err = VortexError::SystemNotFound(SystemId::from_raw(7));
        assert_eq!(err.to_string(), "Particle system not found: #7");
    }
}
