// ABOUTME: Mock backend for testing - returns pre-configured results or faults.
// ABOUTME: Allows deterministic tests of error paths without a real execution engine.
//!
//! # Example
//!
//! ```no_run
//! use vmdocker_runtime::backends::mock::MockBackend;
//! use vmdocker_runtime::{Meta, RuntimeHandle};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mock = MockBackend::new()
//!     .on_action("Eval").respond_data("42")
//!     .on_action("Crash").fail("out of gas");
//!
//! let handle = RuntimeHandle::new(Arc::new(mock), "pid-1");
//! let meta = Meta { action: "Eval".to_string(), ..Meta::default() };
//! let result = handle.apply_result("caller", &meta, None).await.unwrap();
//! assert_eq!(result.data, "42");
//! # }
//! ```

use crate::registry::BackendFactory;
use crate::schema::{ApplyResult, Meta, Params, SpawnRequest};
use crate::traits::RuntimeBackend;
use anyhow::Result;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock backend for testing
pub struct MockBackend {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: AtomicUsize,
}

struct Expectation {
    action: String,
    response: MockResponse,
}

enum MockResponse {
    Result(ApplyResult),
    Fail(String),
}

impl MockBackend {
    /// Create a new mock backend with no expectations
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set up an expectation for the given action
    pub fn on_action(self, action: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            backend: self,
            action: action.to_string(),
        }
    }

    /// Number of apply calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Factory function for the registry
    pub fn factory() -> BackendFactory {
        Box::new(|_spawn: &SpawnRequest| Ok(Arc::new(MockBackend::new()) as Arc<dyn RuntimeBackend>))
    }

    fn take_response(&self, action: &str) -> Option<MockResponse> {
        let mut exp = self.expectations.lock().unwrap_or_else(|e| e.into_inner());
        // FIFO when the front matches, otherwise first match anywhere in the queue
        match exp.front() {
            Some(front) if front.action == action => exp.pop_front().map(|e| e.response),
            Some(_) => exp
                .iter()
                .position(|e| e.action == action)
                .and_then(|i| exp.remove(i))
                .map(|e| e.response),
            None => None,
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn apply<'a>(
        &'a self,
        _from: &'a str,
        meta: &'a Meta,
        params: Option<&'a Params>,
    ) -> BoxFuture<'a, Result<ApplyResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let action = if meta.action.is_empty() {
            params
                .and_then(|p| p.get("Action"))
                .cloned()
                .unwrap_or_default()
        } else {
            meta.action.clone()
        };

        let response = self.take_response(&action);
        Box::pin(async move {
            match response {
                Some(MockResponse::Result(result)) => Ok(result),
                Some(MockResponse::Fail(message)) => Err(anyhow::anyhow!(message)),
                None => Ok(ApplyResult::with_error(format!(
                    "mock: no expectation for '{}'",
                    action
                ))),
            }
        })
    }
}

/// Builder for setting up mock expectations with a fluent API
pub struct ExpectationBuilder {
    backend: MockBackend,
    action: String,
}

impl ExpectationBuilder {
    /// Respond with a full result
    pub fn respond_with(self, result: ApplyResult) -> MockBackend {
        self.push(MockResponse::Result(result))
    }

    /// Respond with a result carrying only `data`
    pub fn respond_data(self, data: &str) -> MockBackend {
        self.respond_with(ApplyResult {
            data: data.to_string(),
            ..ApplyResult::default()
        })
    }

    /// Fail the apply call with a backend fault
    pub fn fail(self, message: &str) -> MockBackend {
        self.push(MockResponse::Fail(message.to_string()))
    }

    fn push(self, response: MockResponse) -> MockBackend {
        self.backend
            .expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Expectation {
                action: self.action,
                response,
            });
        self.backend
    }
}
