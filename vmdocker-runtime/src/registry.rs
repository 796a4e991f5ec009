// ABOUTME: Registry pattern for runtime backend selection.
// ABOUTME: Backends register factories, the agent creates one by configured type name.

use crate::error::RuntimeError;
use crate::handle::RuntimeHandle;
use crate::schema::SpawnRequest;
use crate::traits::RuntimeBackend;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Type name of the built-in reference backend, used when none is configured
pub const RUNTIME_TYPE_TEST: &str = "test";

/// Factory function that builds a backend from the spawn payload
pub type BackendFactory =
    Box<dyn Fn(&SpawnRequest) -> Result<Arc<dyn RuntimeBackend>> + Send + Sync>;

/// Registry for runtime backend selection
pub struct RuntimeRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl RuntimeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory by name
    pub fn register<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&SpawnRequest) -> Result<Arc<dyn RuntimeBackend>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
        self
    }

    /// Create a runtime handle by type name for the given spawn payload
    pub fn create(&self, name: &str, spawn: &SpawnRequest) -> Result<RuntimeHandle, RuntimeError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RuntimeError::UnsupportedType(name.to_string()))?;
        let backend = factory(spawn).map_err(RuntimeError::Init)?;
        Ok(RuntimeHandle::new(backend, spawn.pid.clone()))
    }

    /// List available backend names, sorted
    pub fn available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Whether a factory is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        use crate::backends::test::TestBackend;

        Self::new().register(RUNTIME_TYPE_TEST, TestBackend::factory())
    }
}

impl std::fmt::Debug for RuntimeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeRegistry")
            .field("available", &self.available())
            .finish()
    }
}
