//! Outbound user actions.
//!
//! Interactive components carry an [`ActionDescriptor`]. When the user clicks,
//! edits, or toggles one, the renderer builds an [`ActionEvent`] and hands it
//! to the [`ActionDispatcher`], which calls the registered sink (if any) and
//! broadcasts to passive observers (if any). Nothing is buffered or retried:
//! an event nobody listens for is dropped.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{json, Map, Value};
use tokio::sync::broadcast;

/// The `action` property of a Button, TextField, or Checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ActionDescriptor {
    /// Action name reported back to the message source.
    pub name: String,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A user interaction on a rendered node.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// A button was pressed.
    Click,
    /// A text field was committed with new text.
    Change(String),
    /// A checkbox was toggled to the given state.
    Toggle(bool),
}

impl Interaction {
    /// The `data` payload carried by the resulting event.
    pub fn payload(&self) -> Map<String, Value> {
        let mut data = Map::new();
        match self {
            Interaction::Click => {}
            Interaction::Change(text) => {
                data.insert("value".into(), Value::String(text.clone()));
            }
            Interaction::Toggle(checked) => {
                data.insert("checked".into(), Value::Bool(*checked));
            }
        }
        data
    }
}

/// One user action, ready to be sent back to the message source.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    /// The action name from the component's descriptor.
    pub name: String,
    /// Identifier of the component that triggered the action.
    pub component_id: String,
    /// Interaction-specific data, e.g. `{"value": "..."}`.
    pub payload: Map<String, Value>,
}

impl ActionEvent {
    /// The outbound wire form:
    /// `{"userAction": {"action": {"name", "componentId"}, "data": {...}}}`.
    pub fn to_value(&self) -> Value {
        json!({
            "userAction": {
                "action": {
                    "name": self.name,
                    "componentId": self.component_id,
                },
                "data": self.payload,
            }
        })
    }
}

impl Serialize for ActionEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionEvent", 1)?;
        state.serialize_field("userAction", &self.to_value()["userAction"])?;
        state.end()
    }
}

/// The single-consumer callback that receives every action.
pub type ActionSink = Box<dyn FnMut(&ActionEvent) + Send>;

/// Builds action events and fans them out to a sink and observers.
pub struct ActionDispatcher {
    sink: Option<ActionSink>,
    observers: broadcast::Sender<ActionEvent>,
}

impl ActionDispatcher {
    /// Create a dispatcher whose observer channel holds up to `capacity`
    /// undelivered events per observer.
    pub fn new(capacity: usize) -> Self {
        let (observers, _) = broadcast::channel(capacity.max(1));
        Self {
            sink: None,
            observers,
        }
    }

    /// Register the sink, replacing any previous one.
    pub fn set_sink(&mut self, sink: impl FnMut(&ActionEvent) + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Remove the sink.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Returns `true` if a sink is registered.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Start observing events dispatched from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ActionEvent> {
        self.observers.subscribe()
    }

    /// Build the event and emit it to the sink and all observers.
    pub fn dispatch(
        &mut self,
        descriptor: &ActionDescriptor,
        source_component_id: &str,
        payload: Map<String, Value>,
    ) -> ActionEvent {
        let event = ActionEvent {
            name: descriptor.name.clone(),
            component_id: source_component_id.to_string(),
            payload,
        };
        tracing::debug!(
            action = %event.name,
            component = %event.component_id,
            "action triggered"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink(&event);
        }
        // No receivers is fine; the event is simply dropped.
        let _ = self.observers.send(event.clone());
        event
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(64)
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("has_sink", &self.sink.is_some())
            .field("observers", &self.observers.receiver_count())
            .finish()
    }
}
