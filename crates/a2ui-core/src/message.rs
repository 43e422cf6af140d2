//! Inbound protocol messages.

use crate::component::ComponentDefinition;
use crate::error::Error;
use serde_json::{Map, Value};
use std::str::FromStr;

/// One inbound protocol message.
///
/// On the wire each message is a JSON object with exactly one of the keys
/// `surfaceUpdate`, `dataModelUpdate`, `beginRendering`, or `deleteSurface`.
/// Shapes that match none of them decode to [`Message::Unrecognized`] so that
/// newer producers do not break older renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Register or overwrite component definitions.
    SurfaceUpdate {
        components: Vec<ComponentDefinition>,
    },
    /// Deep-merge a patch into the data model.
    DataModelUpdate { contents: Map<String, Value> },
    /// Set the root component and render.
    BeginRendering { root: String },
    /// Clear the whole surface.
    DeleteSurface,
    /// Anything else; processing it is a no-op.
    Unrecognized,
}

impl Message {
    /// Parse one JSON message.
    ///
    /// Fails only when `text` is not JSON at all. Valid JSON of an unknown
    /// shape parses to [`Message::Unrecognized`].
    pub fn parse(text: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Parse one JSON message from raw bytes.
    ///
    /// Bytes that are not valid UTF-8 fail like any other malformed input.
    pub fn parse_slice(bytes: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value))
    }

    /// Interpret an already-parsed JSON value.
    ///
    /// Keys are checked in the order `surfaceUpdate`, `dataModelUpdate`,
    /// `beginRendering`, `deleteSurface`; the first present one decides the
    /// variant. Component entries without an identifier are skipped, and a
    /// `contents` that is not a mapping merges as an empty patch.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unrecognized;
        };

        if let Some(update) = present(object, "surfaceUpdate") {
            let components = update
                .get("components")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            let definition = ComponentDefinition::from_value(entry);
                            if definition.is_none() {
                                tracing::warn!("skipping component entry without an id");
                            }
                            definition
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Self::SurfaceUpdate { components };
        }

        if let Some(update) = present(object, "dataModelUpdate") {
            let contents = update
                .get("contents")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            return Self::DataModelUpdate { contents };
        }

        if let Some(begin) = present(object, "beginRendering") {
            return match begin.get("root").and_then(Value::as_str) {
                Some(root) if !root.is_empty() => Self::BeginRendering {
                    root: root.to_string(),
                },
                _ => {
                    tracing::warn!("beginRendering without a root; ignoring");
                    Self::Unrecognized
                }
            };
        }

        if present(object, "deleteSurface").is_some() {
            return Self::DeleteSurface;
        }

        Self::Unrecognized
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SurfaceUpdate { .. } => "surfaceUpdate",
            Self::DataModelUpdate { .. } => "dataModelUpdate",
            Self::BeginRendering { .. } => "beginRendering",
            Self::DeleteSurface => "deleteSurface",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl FromStr for Message {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// A key counts as present when it holds anything but null.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}
