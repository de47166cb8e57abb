//! Error types for Borealis effects.
//!
//! Every error here is recoverable at the scene level: a failed effect
//! disables itself or skips one tick, and the rest of the scene continues.

use thiserror::Error;

/// Errors raised while initializing or drawing a visual effect.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The drawing surface for a target could not be acquired.
    #[error("surface unavailable for target '{target}'")]
    SurfaceUnavailable {
        /// Name of the render target that failed
        target: String,
    },

    /// A required render target does not exist at startup.
    #[error("render target '{target}' not found")]
    TargetMissing {
        /// Name of the missing render target
        target: String,
    },

    /// A drawing call failed mid-tick.
    #[error("draw failed: {0}")]
    Draw(String),
}

/// Result type alias for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EffectError::TargetMissing {
            target: "snow-layer-3".to_string(),
        };
        assert_eq!(err.to_string(), "render target 'snow-layer-3' not found");
    }
}
