use crate::lifecycle::LifecycleState;
use crate::render::BackendKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("lattice spacing must be positive and finite, got {0}")]
    InvalidSpacing(f32),
    #[error("hollow ratio must lie in [0, 1), got {0}")]
    InvalidHollowRatio(f32),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{kind:?} context unavailable: {reason}")]
    ContextUnavailable { kind: BackendKind, reason: String },
    #[error("render surface lost")]
    SurfaceLost,
    #[error("graphics device out of memory")]
    OutOfMemory,
    #[error("backend already disposed")]
    Disposed,
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

impl RenderError {
    pub fn unavailable(kind: BackendKind, reason: impl Into<String>) -> Self {
        RenderError::ContextUnavailable {
            kind,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("cannot {action} while {from:?}")]
    InvalidTransition {
        from: LifecycleState,
        action: &'static str,
    },
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}
