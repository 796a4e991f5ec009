// ABOUTME: RuntimeHandle owns the single backend selected for this agent.
// ABOUTME: Forwards apply calls, wraps backend faults and encodes results to JSON.

use crate::error::RuntimeError;
use crate::schema::{ApplyResult, Meta, Params};
use crate::traits::RuntimeBackend;
use std::sync::Arc;

/// Send + Sync handle the agent server stores once a runtime is spawned.
///
/// Cloning is cheap and every clone drives the same backend instance.
#[derive(Clone)]
pub struct RuntimeHandle {
    backend: Arc<dyn RuntimeBackend>,
    pid: String,
}

impl RuntimeHandle {
    /// Wrap a constructed backend for the process identified by `pid`
    pub fn new(backend: Arc<dyn RuntimeBackend>, pid: impl Into<String>) -> Self {
        Self {
            backend,
            pid: pid.into(),
        }
    }

    /// Get the backend name
    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    /// Process id this runtime was spawned for
    pub fn pid(&self) -> &str {
        &self.pid
    }

    /// Apply a message and return the structured result
    pub async fn apply_result(
        &self,
        from: &str,
        meta: &Meta,
        params: Option<&Params>,
    ) -> Result<ApplyResult, RuntimeError> {
        self.backend
            .apply(from, meta, params)
            .await
            .map_err(RuntimeError::ApplyFailed)
    }

    /// Apply a message and return the result in its JSON wire form
    pub async fn apply(
        &self,
        from: &str,
        meta: &Meta,
        params: Option<&Params>,
    ) -> Result<String, RuntimeError> {
        let result = self.apply_result(from, meta, params).await?;
        serde_json::to_string(&result).map_err(|e| {
            tracing::error!(
                error = %e,
                backend = self.name(),
                pid = %self.pid,
                "Failed to encode apply result"
            );
            RuntimeError::Serialize(e)
        })
    }
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("backend", &self.name())
            .field("pid", &self.pid)
            .finish()
    }
}
