// ABOUTME: Pluggable execution runtime abstraction for vmdocker-agent.
// ABOUTME: Backend trait, wire schema, backend registry and the owning RuntimeHandle.

pub mod error;
pub mod handle;
pub mod registry;
pub mod schema;
pub mod traits;

pub mod backends;

pub use error::RuntimeError;
pub use handle::RuntimeHandle;
pub use registry::{BackendFactory, RuntimeRegistry, RUNTIME_TYPE_TEST};
pub use schema::{
    ApplyRequest, ApplyResult, Assignment, Meta, Params, ResMessage, ResSpawn, SpawnRequest, Tag,
};
pub use traits::RuntimeBackend;
