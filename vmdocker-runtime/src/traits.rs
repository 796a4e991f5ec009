// ABOUTME: Core RuntimeBackend trait that all execution backends implement.
// ABOUTME: A single apply entry point that turns an invocation into an ApplyResult.

use crate::schema::{ApplyResult, Meta, Params};
use anyhow::Result;
use futures::future::BoxFuture;

/// Core trait that all runtime backends implement.
///
/// Backends are shared behind an `Arc` by [`crate::RuntimeHandle`] and may be
/// invoked concurrently, so they must be `Send + Sync`.
pub trait RuntimeBackend: Send + Sync {
    /// Backend name for logging and metrics
    fn name(&self) -> &'static str;

    /// Invoke the backend for one message.
    ///
    /// `params` of `None` must be treated exactly like an empty bag. The error
    /// return is reserved for backend faults; business-level problems belong
    /// in [`ApplyResult::error`] so callers can always parse the payload.
    fn apply<'a>(
        &'a self,
        from: &'a str,
        meta: &'a Meta,
        params: Option<&'a Params>,
    ) -> BoxFuture<'a, Result<ApplyResult>>;
}
