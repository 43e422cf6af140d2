//! The bound data store for a surface.

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Nested key/value data that components bind to by dotted path.
///
/// The store only changes through [`merge`](DataModel::merge), which is
/// recursive on mapping values and replaces everything else:
///
/// ```
/// use a2ui_core::DataModel;
/// use serde_json::json;
///
/// let mut data = DataModel::new();
/// data.merge(json!({"a": {"x": 1}}).as_object().unwrap());
/// data.merge(json!({"a": {"y": 2}}).as_object().unwrap());
/// assert_eq!(data.as_value(), json!({"a": {"x": 1, "y": 2}}));
///
/// data.merge(json!({"a": [1, 2]}).as_object().unwrap());
/// assert_eq!(data.as_value(), json!({"a": [1, 2]}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataModel {
    root: Map<String, Value>,
}

impl DataModel {
    /// Create an empty data model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merge `patch` into the model.
    ///
    /// A mapping value merges key-by-key into an existing mapping at the same
    /// key. Any other value, arrays and `null` included, replaces whatever was
    /// there before.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        merge_into(&mut self.root, patch);
    }

    /// Look up a dotted path such as `"user.name"`.
    ///
    /// Returns `None` when a segment is missing or an intermediate value is
    /// not a mapping. Lookups never fail.
    pub fn read(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a dotted path and render it as display text.
    ///
    /// A missing path is the empty string and a stored `null` is `"null"`;
    /// other values go through [`display_text`].
    pub fn read_text(&self, path: &str) -> String {
        match self.read(path) {
            None => String::new(),
            Some(Value::Null) => "null".to_string(),
            Some(value) => display_text(value),
        }
    }

    /// Drop all data.
    pub fn clear(&mut self) {
        self.root.clear();
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrow the top-level mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Clone the whole model into a JSON value.
    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

impl From<Map<String, Value>> for DataModel {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

fn merge_into(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, incoming) in patch {
        if let (Value::Object(nested), Some(Value::Object(existing))) =
            (incoming, target.get_mut(key))
        {
            merge_into(existing, nested);
            continue;
        }
        target.insert(key.clone(), incoming.clone());
    }
}

/// Coerce a data value into the text shown by display components.
///
/// Strings are shown raw, `null` is empty, and everything else (numbers,
/// booleans, mappings, sequences) is shown as [`json_text`].
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => json_text(other),
    }
}

/// Compact JSON text with whole floats written without a fraction, so
/// `10.0` reads `10`.
pub fn json_text(value: &Value) -> String {
    if has_whole_float(value) {
        without_whole_floats(value).to_string()
    } else {
        value.to_string()
    }
}

fn whole_float(number: &Number) -> Option<i64> {
    let float = number.as_f64().filter(|_| number.is_f64())?;
    // beyond 2^53 floats stop being exact integers
    (float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0).then_some(float as i64)
}

fn has_whole_float(value: &Value) -> bool {
    match value {
        Value::Number(number) => whole_float(number).is_some(),
        Value::Array(items) => items.iter().any(has_whole_float),
        Value::Object(map) => map.values().any(has_whole_float),
        _ => false,
    }
}

fn without_whole_floats(value: &Value) -> Value {
    match value {
        Value::Number(number) => whole_float(number).map_or_else(|| value.clone(), Value::from),
        Value::Array(items) => items.iter().map(without_whole_floats).collect(),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), without_whole_floats(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}
