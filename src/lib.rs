// ABOUTME: Root library module exposing the agent server and its HTTP surface
// ABOUTME: Provides config, error mapping, metrics, runtime slot state and routes

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;

pub use error::AgentError;
pub use server::{AgentServer, HealthResponse};

// Re-export runtime types for convenience
pub use vmdocker_runtime::{
    ApplyRequest, ApplyResult, RuntimeBackend, RuntimeError, RuntimeHandle, RuntimeRegistry,
    SpawnRequest,
};
