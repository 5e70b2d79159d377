//! Startup and spawn-time errors.
//!
//! Steady-state tick faults (stale handles, missing entities) are never
//! surfaced as errors; the frame driver logs and skips them.

use thiserror::Error;

/// Errors that can abort game construction or entity spawning.
#[derive(Debug, Error)]
pub enum GameError {
    /// A configuration value rules out a playable world.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An entity was placed at the world center, where the radial field
    /// and outward orientation are undefined.
    #[error("cannot spawn an entity at the world center")]
    SpawnAtCenter,

    /// An operation needed the player entity before it was spawned.
    #[error("player entity has not been spawned")]
    MissingPlayer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InvalidConfig("planet radius must be positive".to_string());
        assert!(err.to_string().contains("planet radius"));
        assert_eq!(
            GameError::SpawnAtCenter.to_string(),
            "cannot spawn an entity at the world center"
        );
    }
}
