// ABOUTME: Agent server state - the single runtime slot and its spawn/apply lifecycle
// ABOUTME: Empty until the first successful spawn, then Ready for the rest of the process

use crate::config::RuntimeConfig;
use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use vmdocker_runtime::{Meta, Params, RuntimeHandle, RuntimeRegistry, SpawnRequest};

/// Liveness report returned by `health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Owns at most one runtime for the lifetime of the process.
///
/// The slot only ever goes from `None` to `Some`. Spawn performs the
/// check-and-set under the write lock so concurrent spawns construct exactly
/// one backend; apply only holds the read lock long enough to clone the handle.
pub struct AgentServer {
    runtime: RwLock<Option<RuntimeHandle>>,
    registry: RuntimeRegistry,
    runtime_type: String,
}

impl AgentServer {
    /// Server using the default backend registry
    pub fn new(runtime_type: impl Into<String>) -> Self {
        Self::with_registry(runtime_type, RuntimeRegistry::default())
    }

    /// Server selecting `runtime_type` from a caller-supplied registry
    pub fn with_registry(runtime_type: impl Into<String>, registry: RuntimeRegistry) -> Self {
        Self {
            runtime: RwLock::new(None),
            registry,
            runtime_type: runtime_type.into(),
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.runtime_type.clone())
    }

    /// Configured registry key used on spawn
    pub fn runtime_type(&self) -> &str {
        &self.runtime_type
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::ok()
    }

    /// Whether a runtime has been spawned
    pub async fn is_spawned(&self) -> bool {
        self.runtime.read().await.is_some()
    }

    /// Current runtime handle, if any
    pub async fn runtime(&self) -> Option<RuntimeHandle> {
        self.runtime.read().await.clone()
    }

    /// Build the configured backend and publish it.
    ///
    /// Fails with `RuntimeNotNil` once a runtime exists, without looking at
    /// `request`. A registry failure leaves the slot empty so a later spawn can
    /// retry.
    pub async fn spawn(&self, request: &SpawnRequest) -> Result<(), AgentError> {
        let mut slot = self.runtime.write().await;
        if slot.is_some() {
            return Err(AgentError::RuntimeNotNil);
        }

        tracing::info!(
            runtime_type = %self.runtime_type,
            pid = %request.pid,
            owner = %request.owner,
            controller = %request.controller_addr,
            init_data_len = request.init_data.len(),
            tags = request.tags.len(),
            "Spawning runtime"
        );

        let handle = self.registry.create(&self.runtime_type, request)?;
        tracing::info!(backend = handle.name(), pid = %handle.pid(), "Runtime ready");
        *slot = Some(handle);
        Ok(())
    }

    /// Apply a message to the spawned runtime and return the encoded result
    pub async fn apply(
        &self,
        from: &str,
        meta: &Meta,
        params: Option<&Params>,
    ) -> Result<String, AgentError> {
        let handle = self.runtime().await.ok_or(AgentError::RuntimeNil)?;
        Ok(handle.apply(from, meta, params).await?)
    }
}

impl std::fmt::Debug for AgentServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentServer")
            .field("runtime_type", &self.runtime_type)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
