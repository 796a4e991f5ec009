// ABOUTME: Reference runtime backend - deterministic Echo/Ping responder.
// ABOUTME: Default backend and the canonical example of the ApplyResult shape.

use crate::registry::{BackendFactory, RUNTIME_TYPE_TEST};
use crate::schema::{ApplyResult, Meta, Params, ResMessage, SpawnRequest, Tag};
use crate::traits::RuntimeBackend;
use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ACTION_PING: &str = "Ping";
pub const ACTION_ECHO: &str = "Echo";

const DEFAULT_DATA: &str = "test-runtime-ok";
const PONG: &str = "Pong";

/// Stateless reference backend.
///
/// Resolves each field independently from meta, params and fixed defaults,
/// and always answers with exactly one outbound message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestBackend;

impl TestBackend {
    pub fn new() -> Self {
        Self
    }

    /// Factory function for the registry
    pub fn factory() -> BackendFactory {
        Box::new(|_spawn: &SpawnRequest| Ok(Arc::new(TestBackend::new()) as Arc<dyn RuntimeBackend>))
    }

    /// Build the response for one invocation. Never fails.
    pub fn respond(&self, from: &str, meta: &Meta, params: Option<&Params>) -> ApplyResult {
        tracing::info!(
            from = %from,
            action = %meta.action,
            sequence = meta.sequence,
            pid = %meta.pid,
            item_id = %meta.item_id,
            params = params.map(|p| p.len()).unwrap_or(0),
            "Test runtime apply received"
        );

        let action = first_non_empty(&[meta.action.as_str(), param(params, "Action")])
            .unwrap_or(ACTION_ECHO)
            .to_string();

        let data =
            first_non_empty(&[param(params, "Data"), meta.data.as_str()]).unwrap_or(DEFAULT_DATA);

        let response_data = if action == ACTION_PING {
            PONG.to_string()
        } else {
            data.to_string()
        };

        let sequence = match param(params, "Reference") {
            "" => meta.sequence.to_string(),
            reference => reference.to_string(),
        };

        let target = if from.is_empty() {
            param(params, "From").to_string()
        } else {
            from.to_string()
        };

        let message = ResMessage {
            sequence: sequence.clone(),
            target: target.clone(),
            data: response_data.clone(),
            tags: vec![
                Tag::new("Data-Protocol", "ao"),
                Tag::new("Variant", "hymatrix0.1"),
                Tag::new("Type", "Message"),
                Tag::new("Runtime", RUNTIME_TYPE_TEST),
                Tag::new("Action", action.as_str()),
                Tag::new("Reference", sequence.as_str()),
            ],
        };

        let mut output = Map::new();
        output.insert("runtime".into(), Value::from(RUNTIME_TYPE_TEST));
        output.insert("action".into(), Value::from(action.as_str()));
        output.insert("pid".into(), Value::from(meta.pid.as_str()));
        output.insert("itemId".into(), Value::from(meta.item_id.as_str()));
        output.insert("from".into(), Value::from(from));
        output.insert("sequence".into(), Value::from(sequence.as_str()));

        let cache = BTreeMap::from([
            ("runtime".to_string(), RUNTIME_TYPE_TEST.to_string()),
            ("action".to_string(), action.clone()),
        ]);

        let result = ApplyResult {
            messages: vec![message],
            spawns: Vec::new(),
            assignments: None,
            output,
            data: response_data,
            cache,
            error: None,
        };

        tracing::info!(
            action = %action,
            target = %target,
            sequence = %sequence,
            data = %result.data,
            messages = result.messages.len(),
            "Test runtime apply response"
        );
        result
    }
}

impl RuntimeBackend for TestBackend {
    fn name(&self) -> &'static str {
        RUNTIME_TYPE_TEST
    }

    fn apply<'a>(
        &'a self,
        from: &'a str,
        meta: &'a Meta,
        params: Option<&'a Params>,
    ) -> BoxFuture<'a, Result<ApplyResult>> {
        let result = self.respond(from, meta, params);
        Box::pin(async move { Ok(result) })
    }
}

/// Look up a parameter, treating a missing bag or key as empty
fn param<'p>(params: Option<&'p Params>, key: &str) -> &'p str {
    params
        .and_then(|p| p.get(key))
        .map(String::as_str)
        .unwrap_or("")
}

fn first_non_empty<'s>(candidates: &[&'s str]) -> Option<&'s str> {
    candidates.iter().copied().find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_everything_is_empty() {
        let result = TestBackend::new().respond("", &Meta::default(), None);
        assert_eq!(result.data, DEFAULT_DATA);
        assert_eq!(result.cache["action"], ACTION_ECHO);
        assert_eq!(result.messages[0].sequence, "0");
        assert_eq!(result.messages[0].target, "");
    }

    #[test]
    fn test_meta_action_wins_over_params() {
        let params = Params::from([("Action".to_string(), ACTION_PING.to_string())]);
        let meta = Meta {
            action: "Transfer".to_string(),
            ..Meta::default()
        };
        let result = TestBackend::new().respond("p", &meta, Some(&params));
        assert_eq!(result.output["action"], "Transfer");
        assert_ne!(result.data, PONG);
    }

    #[test]
    fn test_params_action_used_when_meta_empty() {
        let params = Params::from([("Action".to_string(), ACTION_PING.to_string())]);
        let result = TestBackend::new().respond("p", &Meta::default(), Some(&params));
        assert_eq!(result.data, PONG);
    }

    #[test]
    fn test_reference_param_overrides_sequence() {
        let params = Params::from([("Reference".to_string(), "ref-42".to_string())]);
        let meta = Meta {
            sequence: 9,
            ..Meta::default()
        };
        let result = TestBackend::new().respond("p", &meta, Some(&params));
        assert_eq!(result.messages[0].sequence, "ref-42");
        assert_eq!(result.output["sequence"], "ref-42");
    }

    #[test]
    fn test_negative_sequence_formats_as_decimal() {
        let meta = Meta {
            sequence: -3,
            ..Meta::default()
        };
        let result = TestBackend::new().respond("p", &meta, None);
        assert_eq!(result.messages[0].sequence, "-3");
    }

    #[test]
    fn test_first_non_empty_skips_blanks() {
        assert_eq!(first_non_empty(&["", "b", "c"]), Some("b"));
        assert_eq!(first_non_empty(&["", ""]), None);
    }
}
