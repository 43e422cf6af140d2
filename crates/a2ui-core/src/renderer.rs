use crate::action::{ActionDispatcher, ActionEvent, Interaction};
use crate::data_model::DataModel;
use crate::error::Error;
use crate::message::Message;
use crate::node::{Node, NodeKind};
use crate::presenter::Presenter;
use crate::registry::Registry;
use crate::render::{render_tree, Diagnostic, DEFAULT_MAX_DEPTH};
use tokio::sync::broadcast;

/// Configuration for a [`Renderer`].
///
/// Use struct update syntax to override only what you need:
///
/// ```
/// use a2ui_core::RendererOptions;
///
/// let options = RendererOptions {
///     max_depth: 32,
///     ..RendererOptions::default()
/// };
/// assert_eq!(options.action_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    /// Deepest component nesting expanded before a placeholder is shown
    /// (default: 256).
    pub max_depth: usize,
    /// Per-observer buffer of the action broadcast channel (default: 64).
    pub action_capacity: usize,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            action_capacity: 64,
        }
    }
}

/// Lifecycle phase of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No root set; data updates do not render.
    Empty,
    /// A root is set; every data update re-renders the whole tree.
    Rendering,
}

/// The state of one surface: root identifier, components, and data.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub root_id: Option<String>,
    pub registry: Registry,
    pub data: DataModel,
}

impl Surface {
    pub fn phase(&self) -> Phase {
        if self.root_id.is_some() {
            Phase::Rendering
        } else {
            Phase::Empty
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.root_id = None;
        self.registry.clear();
        self.data.clear();
    }
}

/// Drives one surface from protocol messages.
///
/// `Renderer` is the protocol state machine. Feed it messages with
/// [`process`](Renderer::process) (or one of the string entry points); it
/// updates its [`Surface`], re-renders the whole tree when required, and
/// hands the result to its [`Presenter`]. User interaction on the rendered
/// tree goes through [`interact`](Renderer::interact).
///
/// Everything is synchronous. A renderer belongs to one task; stream sources
/// feed it through a channel (see [`crate::source`]).
///
/// # Example
///
/// ```
/// use a2ui_core::{Phase, Renderer};
///
/// let mut renderer = Renderer::new();
/// renderer
///     .process_jsonl(concat!(
///         r#"{"surfaceUpdate":{"components":[{"id":"t","component":{"Text":{"text":{"path":"greeting"}}}}]}}"#, "\n",
///         r#"{"dataModelUpdate":{"contents":{"greeting":"Hello"}}}"#, "\n",
///         r#"{"beginRendering":{"root":"t"}}"#, "\n",
///     ))
///     .unwrap();
/// assert_eq!(renderer.phase(), Phase::Rendering);
/// assert_eq!(renderer.generation(), 1);
/// ```
pub struct Renderer<P: Presenter = ()> {
    surface: Surface,
    presented: Option<Node>,
    presenter: P,
    actions: ActionDispatcher,
    options: RendererOptions,
    generation: u64,
    diagnostics: Vec<Diagnostic>,
}

impl Renderer<()> {
    /// A headless renderer with default options.
    pub fn new() -> Self {
        Self::with_presenter((), RendererOptions::default())
    }

    /// A headless renderer with custom options.
    pub fn with_options(options: RendererOptions) -> Self {
        Self::with_presenter((), options)
    }
}

impl Default for Renderer<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Presenter> Renderer<P> {
    /// A renderer writing into `presenter`.
    pub fn with_presenter(presenter: P, options: RendererOptions) -> Self {
        Self {
            surface: Surface::default(),
            presented: None,
            presenter,
            actions: ActionDispatcher::new(options.action_capacity),
            options,
            generation: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Apply one message.
    ///
    /// Unrecognized messages are ignored.
    pub fn process(&mut self, message: Message) {
        tracing::debug!(kind = message.kind(), "processing message");
        match message {
            Message::SurfaceUpdate { components } => {
                self.surface.registry.register(components);
            }
            Message::DataModelUpdate { contents } => {
                self.surface.data.merge(&contents);
                if self.surface.phase() == Phase::Rendering {
                    self.render();
                }
            }
            Message::BeginRendering { root } => {
                self.surface.root_id = Some(root);
                self.render();
            }
            Message::DeleteSurface => {
                self.surface.clear();
                self.presented = None;
                self.diagnostics.clear();
                self.presenter.clear();
            }
            Message::Unrecognized => {
                tracing::debug!("ignoring unrecognized message");
            }
        }
    }

    /// Parse and apply one JSON message.
    ///
    /// A parse failure is returned and leaves the surface untouched.
    pub fn process_str(&mut self, text: &str) -> Result<(), Error> {
        let message = Message::parse(text)?;
        self.process(message);
        Ok(())
    }

    /// Apply newline-delimited JSON, one message per non-blank line.
    ///
    /// Malformed lines are skipped and the rest still apply; if there were
    /// any, they are reported together as [`Error::MalformedBatch`]. Returns
    /// the number of messages applied.
    pub fn process_jsonl(&mut self, jsonl: &str) -> Result<usize, Error> {
        let mut applied = 0;
        let mut failed = Vec::new();
        for (index, line) in jsonl.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match Message::parse(line) {
                Ok(message) => {
                    self.process(message);
                    applied += 1;
                }
                Err(Error::MalformedMessage(err)) => {
                    tracing::warn!(line = index + 1, error = %err, "malformed message line");
                    failed.push((index + 1, err));
                }
                Err(other) => return Err(other),
            }
        }
        if failed.is_empty() {
            Ok(applied)
        } else {
            Err(Error::MalformedBatch { lines: failed })
        }
    }

    /// Re-render from the current root, if one is set.
    ///
    /// The presenter is cleared first and then given the new tree, so no part
    /// of the previous tree survives.
    pub fn render(&mut self) {
        let Some(root_id) = self.surface.root_id.as_deref() else {
            return;
        };
        let output = render_tree(
            root_id,
            &self.surface.registry,
            &self.surface.data,
            self.options.max_depth,
        );
        self.presenter.clear();
        self.presented = None;
        self.presenter.present(&output.root);
        self.presented = Some(output.root);
        self.diagnostics = output.diagnostics;
        self.generation += 1;
    }

    /// Render the subtree at `root_id` without touching the surface.
    pub fn render_from(&self, root_id: &str) -> Node {
        render_tree(
            root_id,
            &self.surface.registry,
            &self.surface.data,
            self.options.max_depth,
        )
        .root
    }

    /// Route a user interaction on a rendered node to the action dispatcher.
    ///
    /// Dispatches only when the node exists in the current tree, its kind
    /// accepts the interaction (click: button, change: text field, toggle:
    /// checkbox), it carries an action, and, for buttons, it is enabled.
    pub fn interact(&mut self, component_id: &str, interaction: Interaction) -> Option<ActionEvent> {
        let node = self.presented.as_ref()?.find(component_id)?;
        let accepted = matches!(
            (&node.kind, &interaction),
            (NodeKind::Button { disabled: false, .. }, Interaction::Click)
                | (NodeKind::TextField { .. }, Interaction::Change(_))
                | (NodeKind::Checkbox { .. }, Interaction::Toggle(_))
        );
        if !accepted {
            tracing::debug!(component = component_id, ?interaction, "interaction ignored");
            return None;
        }
        let descriptor = node.action()?.clone();
        Some(
            self.actions
                .dispatch(&descriptor, component_id, interaction.payload()),
        )
    }

    /// Register the single action sink, replacing any previous one.
    pub fn on_action(&mut self, sink: impl FnMut(&ActionEvent) + Send + 'static) {
        self.actions.set_sink(sink);
    }

    /// Observe actions without owning the sink.
    pub fn subscribe_actions(&self) -> broadcast::Receiver<ActionEvent> {
        self.actions.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.surface.phase()
    }

    pub fn root_id(&self) -> Option<&str> {
        self.surface.root_id.as_deref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn registry(&self) -> &Registry {
        &self.surface.registry
    }

    pub fn data_model(&self) -> &DataModel {
        &self.surface.data
    }

    /// The tree currently on the surface.
    pub fn presented(&self) -> Option<&Node> {
        self.presented.as_ref()
    }

    /// Number of full renders performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Diagnostics from the most recent render.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

impl<P: Presenter> std::fmt::Debug for Renderer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("surface", &self.surface)
            .field("presented", &self.presented)
            .field("generation", &self.generation)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Axis, TextRole};
    use crate::testing::{PresenterCall, Recorder};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn send(renderer: &mut Renderer<impl Presenter>, value: serde_json::Value) {
        renderer.process(Message::from_value(&value));
    }

    fn hello_components() -> serde_json::Value {
        json!({"surfaceUpdate": {"components": [
            {"id": "r", "component": {"Column": {"children": {"explicitList": ["t1"]}}}},
            {"id": "t1", "component": {"Text": {"text": {"literalString": "Hello"}}}}
        ]}})
    }

    #[test]
    fn end_to_end_hello() {
        let mut renderer = Renderer::new();
        send(&mut renderer, hello_components());
        assert!(renderer.presented().is_none());

        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        let root = renderer.presented().unwrap();
        assert_eq!(
            root,
            &Node::new(
                "r",
                NodeKind::Container {
                    axis: Axis::Column,
                    alignment: None,
                    spacing: None,
                    children: vec![Node::new(
                        "t1",
                        NodeKind::Text {
                            role: TextRole::Body,
                            content: "Hello".into()
                        }
                    )]
                }
            )
        );
    }

    #[test]
    fn surface_update_does_not_render() {
        let mut renderer = Renderer::with_presenter(Recorder::default(), RendererOptions::default());
        send(&mut renderer, hello_components());
        assert!(renderer.presenter().calls().is_empty());
        assert_eq!(renderer.generation(), 0);
    }

    #[test]
    fn data_update_before_begin_does_not_render() {
        let mut renderer = Renderer::with_presenter(Recorder::default(), RendererOptions::default());
        send(&mut renderer, json!({"dataModelUpdate": {"contents": {"a": 1}}}));
        assert_eq!(renderer.phase(), Phase::Empty);
        assert!(renderer.presenter().calls().is_empty());
        assert_eq!(renderer.data_model().as_value(), json!({"a": 1}));
    }

    #[test]
    fn every_data_update_rerenders_whole_tree() {
        let mut renderer = Renderer::with_presenter(Recorder::default(), RendererOptions::default());
        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "t", "component": {"Text": {"text": {"path": "count"}}}}
            ]}}),
        );
        send(&mut renderer, json!({"beginRendering": {"root": "t"}}));
        for n in 1..=3 {
            send(&mut renderer, json!({"dataModelUpdate": {"contents": {"count": n}}}));
        }
        assert_eq!(renderer.generation(), 4);

        let presents: Vec<_> = renderer
            .presenter()
            .calls()
            .iter()
            .filter_map(|call| match call {
                PresenterCall::Present(node) => Some(node.clone()),
                PresenterCall::Clear => None,
            })
            .collect();
        assert_eq!(presents.len(), 4);
        assert_eq!(
            presents[3].kind,
            NodeKind::Text {
                role: TextRole::Body,
                content: "3".into()
            }
        );
        // each render clears before presenting
        assert!(renderer
            .presenter()
            .calls()
            .chunks(2)
            .all(|pair| matches!(pair, [PresenterCall::Clear, PresenterCall::Present(_)])));
    }

    #[test]
    fn components_added_after_begin_show_on_next_render() {
        let mut renderer = Renderer::new();
        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "r", "component": {"Column": {"children": {"explicitList": ["late"]}}}}
            ]}}),
        );
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        assert!(renderer.presented().unwrap().children()[0].is_placeholder());

        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "late", "component": {"Text": {"text": {"literalString": "here"}}}}
            ]}}),
        );
        // registration alone does not render
        assert!(renderer.presented().unwrap().children()[0].is_placeholder());

        send(&mut renderer, json!({"dataModelUpdate": {"contents": {}}}));
        assert!(!renderer.presented().unwrap().children()[0].is_placeholder());
    }

    #[test]
    fn delete_surface_resets_everything() {
        let mut renderer = Renderer::with_presenter(Recorder::default(), RendererOptions::default());
        send(&mut renderer, hello_components());
        send(&mut renderer, json!({"dataModelUpdate": {"contents": {"x": 1}}}));
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        send(&mut renderer, json!({"deleteSurface": {}}));

        assert_eq!(renderer.phase(), Phase::Empty);
        assert!(renderer.registry().is_empty());
        assert!(renderer.data_model().is_empty());
        assert!(renderer.presented().is_none());
        assert_eq!(renderer.root_id(), None);
        assert_eq!(renderer.presenter().calls().last(), Some(&PresenterCall::Clear));

        let calls_before = renderer.presenter().calls().len();
        send(&mut renderer, json!({"dataModelUpdate": {"contents": {"y": 2}}}));
        assert_eq!(renderer.presenter().calls().len(), calls_before);
        assert!(renderer.presented().is_none());
    }

    #[test]
    fn begin_then_delete_lifecycle() {
        let mut renderer = Renderer::new();
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        assert_eq!(renderer.phase(), Phase::Rendering);
        send(&mut renderer, json!({"deleteSurface": {}}));
        assert_eq!(renderer.phase(), Phase::Empty);
        assert!(renderer.registry().is_empty());
        assert!(renderer.data_model().is_empty());
        assert!(renderer.presented().is_none());
    }

    #[test]
    fn unrecognized_messages_are_noops() {
        let mut renderer = Renderer::new();
        send(&mut renderer, hello_components());
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        let before = renderer.presented().cloned();
        send(&mut renderer, json!({"somethingNew": {"x": 1}}));
        assert_eq!(renderer.presented().cloned(), before);
        assert_eq!(renderer.generation(), 1);
    }

    #[test]
    fn malformed_string_leaves_state_untouched() {
        let mut renderer = Renderer::new();
        renderer
            .process_str(r#"{"dataModelUpdate":{"contents":{"a":1}}}"#)
            .unwrap();
        assert!(matches!(
            renderer.process_str("{oops"),
            Err(Error::MalformedMessage(_))
        ));
        assert_eq!(renderer.data_model().as_value(), json!({"a": 1}));
        // still usable afterwards
        renderer
            .process_str(r#"{"dataModelUpdate":{"contents":{"b":2}}}"#)
            .unwrap();
        assert_eq!(renderer.data_model().as_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn jsonl_applies_good_lines_around_bad_ones() {
        let mut renderer = Renderer::new();
        let result = renderer.process_jsonl(concat!(
            "{\"dataModelUpdate\":{\"contents\":{\"a\":1}}}\n",
            "\n",
            "not json\n",
            "{\"dataModelUpdate\":{\"contents\":{\"b\":2}}}\n",
        ));
        match result {
            Err(Error::MalformedBatch { lines }) => {
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0].0, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(renderer.data_model().as_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn jsonl_counts_applied_messages() {
        let mut renderer = Renderer::new();
        let applied = renderer
            .process_jsonl("{\"deleteSurface\":{}}\n\n{\"deleteSurface\":{}}\n")
            .unwrap();
        assert_eq!(applied, 2);
    }

    #[test]
    fn render_from_is_deterministic_and_pure() {
        let mut renderer = Renderer::new();
        send(&mut renderer, hello_components());
        let first = renderer.render_from("r");
        let second = renderer.render_from("r");
        assert_eq!(first, second);
        assert!(renderer.presented().is_none());
        assert_eq!(renderer.generation(), 0);
    }

    #[test]
    fn diagnostics_follow_latest_render() {
        let mut renderer = Renderer::new();
        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "r", "component": {"Column": {"children": {"explicitList": ["missing"]}}}}
            ]}}),
        );
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        assert_eq!(
            renderer.diagnostics(),
            &[Diagnostic::UnresolvedComponent {
                id: "missing".into()
            }]
        );
        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "missing", "component": {"Text": {}}}
            ]}}),
        );
        send(&mut renderer, json!({"dataModelUpdate": {"contents": {}}}));
        assert!(renderer.diagnostics().is_empty());
    }

    fn interactive_renderer() -> Renderer {
        let mut renderer = Renderer::new();
        send(
            &mut renderer,
            json!({"surfaceUpdate": {"components": [
                {"id": "r", "component": {"Column": {"children": {"explicitList": ["go", "off", "name", "agree", "plain"]}}}},
                {"id": "go", "component": {"Button": {"label": {"literalString": "Go"}, "action": {"name": "submit"}}}},
                {"id": "off", "component": {"Button": {"label": {"literalString": "Off"}, "disabled": {"literalString": "true"}, "action": {"name": "never"}}}},
                {"id": "name", "component": {"TextField": {"action": {"name": "set_name"}}}},
                {"id": "agree", "component": {"Checkbox": {"label": {"literalString": "Agree"}, "action": {"name": "toggle_agree"}}}},
                {"id": "plain", "component": {"Button": {"label": {"literalString": "No action"}}}}
            ]}}),
        );
        send(&mut renderer, json!({"beginRendering": {"root": "r"}}));
        renderer
    }

    #[test]
    fn click_dispatches_to_sink() {
        let mut renderer = interactive_renderer();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        renderer.on_action(move |event| sink_seen.lock().unwrap().push(event.clone()));

        let event = renderer.interact("go", Interaction::Click).unwrap();
        assert_eq!(event.name, "submit");
        assert_eq!(event.component_id, "go");
        assert!(event.payload.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![event]);
    }

    #[test]
    fn change_and_toggle_payloads() {
        let mut renderer = interactive_renderer();
        let mut observer = renderer.subscribe_actions();

        let changed = renderer
            .interact("name", Interaction::Change("Ada".into()))
            .unwrap();
        assert_eq!(
            changed.to_value(),
            json!({"userAction": {"action": {"name": "set_name", "componentId": "name"}, "data": {"value": "Ada"}}})
        );
        let toggled = renderer.interact("agree", Interaction::Toggle(true)).unwrap();
        assert_eq!(toggled.payload.get("checked"), Some(&json!(true)));

        assert_eq!(observer.try_recv().unwrap().name, "set_name");
        assert_eq!(observer.try_recv().unwrap().name, "toggle_agree");
    }

    #[test]
    fn interactions_that_do_not_apply_are_ignored() {
        let mut renderer = interactive_renderer();
        assert!(renderer.interact("off", Interaction::Click).is_none());
        assert!(renderer.interact("plain", Interaction::Click).is_none());
        assert!(renderer.interact("go", Interaction::Toggle(true)).is_none());
        assert!(renderer.interact("nobody", Interaction::Click).is_none());

        let mut empty = Renderer::new();
        assert!(empty.interact("go", Interaction::Click).is_none());
    }
}
