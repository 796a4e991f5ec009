// ABOUTME: Error taxonomy for runtime selection and invocation.
// ABOUTME: Keeps selection, init, apply and serialization failures distinguishable.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No factory is registered for the configured runtime type.
    #[error("runtime type not supported: {0}")]
    UnsupportedType(String),

    /// The factory was found but could not construct the backend.
    #[error("{0}")]
    Init(anyhow::Error),

    /// The backend reported a fault while applying a message.
    #[error("runtime apply failed: {0}")]
    ApplyFailed(anyhow::Error),

    /// The backend produced a result that cannot be encoded.
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

impl RuntimeError {
    /// Stable identifier for programmatic handling and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::UnsupportedType(_) => "unsupported",
            RuntimeError::Init(_) => "init_failed",
            RuntimeError::ApplyFailed(_) => "apply_failed",
            RuntimeError::Serialize(_) => "serialize_failed",
        }
    }
}
