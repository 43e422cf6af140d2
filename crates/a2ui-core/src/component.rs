//! Component definitions as they arrive in `surfaceUpdate` batches.
//!
//! Each wire component is an object with a single key naming its kind:
//!
//! ```json
//! {"id": "greeting", "component": {"Text": {"text": {"literalString": "Hi"}, "usageHint": "h1"}}}
//! ```
//!
//! Decoding is lenient. Bound values accept several degenerate shapes, and a
//! known kind whose properties fail to decode is kept as
//! [`ComponentKind::Unknown`] so it renders as a placeholder instead of
//! rejecting the whole batch.

use crate::action::ActionDescriptor;
use crate::data_model::display_text;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::{Map, Value};

/// A value that is either baked into the message or read from the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    /// A literal, already coerced to text.
    Literal(String),
    /// A dotted path into the data model, e.g. `"user.name"`.
    Path(String),
}

impl BoundValue {
    /// Shorthand for [`BoundValue::Literal`].
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Shorthand for [`BoundValue::Path`].
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Interpret a wire value.
    ///
    /// `{"literalString": x}` wins over `{"path": p}`. A bare string is a
    /// literal, other scalars become their JSON text, and objects with neither
    /// key (or an empty path) resolve to the empty literal.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(literal) = map.get("literalString") {
                    return Self::Literal(display_text(literal));
                }
                match map.get("path") {
                    Some(Value::String(path)) if !path.is_empty() => Self::Path(path.clone()),
                    _ => Self::Literal(String::new()),
                }
            }
            other => Self::Literal(display_text(other)),
        }
    }
}

impl<'de> Deserialize<'de> for BoundValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Child references of a container or list.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Children {
    /// Ordered child identifiers (Column and Row).
    pub explicit_list: Vec<String>,
    /// Data-driven items (List).
    pub template: Option<Template>,
}

/// The data source of a list.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Template {
    /// Must resolve to a sequence for any items to appear.
    pub source: Option<BoundValue>,
}

/// Properties shared by `Column` and `Row`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ContainerProps {
    pub children: Children,
    /// Opaque alignment tag, e.g. `"center"` or `"spaceBetween"`.
    pub alignment: Option<String>,
    /// Opaque spacing tag, e.g. `"medium"`.
    pub spacing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProps {
    pub text: Option<BoundValue>,
    /// One of `h1`, `h2`, `h3`, `caption`, `body`.
    pub usage_hint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ButtonProps {
    pub label: Option<BoundValue>,
    /// Disabled only when this resolves to the exact text `"true"`.
    pub disabled: Option<BoundValue>,
    pub action: Option<ActionDescriptor>,
    /// Opaque style tag, e.g. `"primary"` or `"danger"`.
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CardProps {
    /// A single child identifier.
    pub child: Option<String>,
    pub elevation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ImageProps {
    pub url: Option<BoundValue>,
    pub alt: Option<BoundValue>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct TextFieldProps {
    pub label: Option<BoundValue>,
    /// Input sub-type such as `"email"`; `"text"` when absent.
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub placeholder: Option<BoundValue>,
    pub value: Option<BoundValue>,
    pub action: Option<ActionDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct CheckboxProps {
    pub label: Option<BoundValue>,
    /// Checked only when this resolves to the exact text `"true"`.
    pub checked: Option<BoundValue>,
    pub action: Option<ActionDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ListProps {
    pub children: Children,
}

/// The closed set of component kinds, each with its property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Column(ContainerProps),
    Row(ContainerProps),
    Text(TextProps),
    Button(ButtonProps),
    Card(CardProps),
    Image(ImageProps),
    TextField(TextFieldProps),
    Checkbox(CheckboxProps),
    List(ListProps),
    /// Anything else, keeping the tag for the placeholder.
    Unknown { tag: String },
}

impl ComponentKind {
    /// Decode a kind from its wire tag and property bag.
    ///
    /// Unrecognized tags, and recognized tags whose properties do not decode,
    /// both produce [`ComponentKind::Unknown`].
    pub fn from_wire(tag: &str, props: &Value) -> Self {
        let decoded = match tag {
            "Column" => decode(props).map(Self::Column),
            "Row" => decode(props).map(Self::Row),
            "Text" => decode(props).map(Self::Text),
            "Button" => decode(props).map(Self::Button),
            "Card" => decode(props).map(Self::Card),
            "Image" => decode(props).map(Self::Image),
            "TextField" => decode(props).map(Self::TextField),
            "Checkbox" => decode(props).map(Self::Checkbox),
            "List" => decode(props).map(Self::List),
            _ => {
                return Self::Unknown {
                    tag: tag.to_string(),
                }
            }
        };
        decoded.unwrap_or_else(|err| {
            tracing::warn!(kind = tag, error = %err, "malformed component properties");
            Self::Unknown {
                tag: tag.to_string(),
            }
        })
    }

    /// The wire tag of this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Column(_) => "Column",
            Self::Row(_) => "Row",
            Self::Text(_) => "Text",
            Self::Button(_) => "Button",
            Self::Card(_) => "Card",
            Self::Image(_) => "Image",
            Self::TextField(_) => "TextField",
            Self::Checkbox(_) => "Checkbox",
            Self::List(_) => "List",
            Self::Unknown { tag } => tag,
        }
    }
}

fn decode<T: DeserializeOwned + Default>(props: &Value) -> Result<T, serde_json::Error> {
    match props {
        Value::Null => Ok(T::default()),
        other => T::deserialize(other),
    }
}

/// One registered component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    /// Stable identifier, unique within a surface.
    pub id: String,
    pub kind: ComponentKind,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Decode one entry of `surfaceUpdate.components`.
    ///
    /// Returns `None` when the entry has no string `id`. The kind is the first
    /// key of the `component` object; a missing or empty `component` yields an
    /// unknown kind with an empty tag.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let id = entry.get("id")?.as_str()?.to_string();
        let kind = match entry.get("component").and_then(Value::as_object) {
            Some(component) => kind_of(component),
            None => ComponentKind::Unknown { tag: String::new() },
        };
        Some(Self { id, kind })
    }
}

fn kind_of(component: &Map<String, Value>) -> ComponentKind {
    match component.iter().next() {
        Some((tag, props)) => ComponentKind::from_wire(tag, props),
        None => ComponentKind::Unknown { tag: String::new() },
    }
}
