// ABOUTME: Agent-level error taxonomy and its HTTP mapping
// ABOUTME: State violations answer with {"msg"}, everything else with {"error"}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use vmdocker_runtime::RuntimeError;

pub const MSG_RUNTIME_NOT_NIL: &str = "runtime is not nil";
pub const MSG_RUNTIME_NIL: &str = "runtime is nil";

#[derive(Debug, Error)]
pub enum AgentError {
    /// Spawn after a runtime already exists
    #[error("runtime is not nil")]
    RuntimeNotNil,

    /// Apply before any runtime exists
    #[error("runtime is nil")]
    RuntimeNil,

    /// Selection, init, apply or encode failure from the runtime layer
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Request body could not be decoded
    #[error("{0}")]
    InvalidRequest(String),
}

impl AgentError {
    /// True for double spawn and apply-before-spawn
    pub fn is_state_violation(&self) -> bool {
        matches!(self, AgentError::RuntimeNotNil | AgentError::RuntimeNil)
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let body = if self.is_state_violation() {
            json!({ "msg": self.to_string() })
        } else {
            json!({ "error": self.to_string() })
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
