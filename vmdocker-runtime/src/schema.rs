// ABOUTME: Wire types shared by the agent server and runtime backends.
// ABOUTME: Spawn/apply request payloads plus the ApplyResult shape backends must produce.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// String-keyed parameter bag passed to `apply`. Key order is irrelevant.
pub type Params = HashMap<String, String>;

/// Name/value pair attached to messages and spawn payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Caller-supplied context for an apply call.
///
/// Empty `action` or `data` means the backend should fall back to the
/// parameter bag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Meta {
    pub action: String,
    pub data: String,
    pub sequence: i64,
    pub pid: String,
    #[serde(rename = "itemId")]
    pub item_id: String,
}

/// One-time construction payload for a runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnRequest {
    pub pid: String,
    pub owner: String,
    pub controller_addr: String,
    /// Raw initialization bytes, carried as standard base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub init_data: Vec<u8>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Opaque execution environment forwarded to the backend factory.
    pub env: Value,
}

/// Body of an apply call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApplyRequest {
    pub from: String,
    pub meta: Meta,
    pub params: Option<Params>,
}

/// Outbound message emitted by a backend, routed by downstream infrastructure.
///
/// Consumers match tags by position, so producers must keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResMessage {
    pub sequence: String,
    pub target: String,
    pub data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// Child process spawn requested by a backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResSpawn {
    pub sequence: String,
    pub data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
}

/// Re-delivery of an existing message to other processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub processes: Vec<String>,
    pub message: String,
}

/// Structured result of one apply call.
///
/// `error` carries business-level failures; when it is set the rest of the
/// structure is still well formed so callers can inspect partial output.
/// Field order here is the wire order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApplyResult {
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<ResMessage>,
    #[serde(deserialize_with = "null_as_default")]
    pub spawns: Vec<ResSpawn>,
    pub assignments: Option<Vec<Assignment>>,
    #[serde(deserialize_with = "null_as_default")]
    pub output: Map<String, Value>,
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cache: BTreeMap<String, String>,
    pub error: Option<String>,
}

impl ApplyResult {
    /// Result that only reports a business-level error.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Go peers encode nil slices and maps as `null`; read those as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
