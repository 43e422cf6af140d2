//! Core engine for **a2ui** streaming surfaces.
//!
//! An agent describes a user interface as a stream of JSON messages: batches
//! of component definitions, patches to a bound data model, a signal naming
//! the root component, and surface deletion. `a2ui-core` turns that stream
//! into a plain presentation tree and routes user interaction back out as
//! action events. It does no I/O of its own beyond the optional
//! [`sources`], and it never draws; painting is left to a [`Presenter`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Message`] | One decoded protocol message |
//! | [`Renderer`] | Protocol state machine owning one [`Surface`] |
//! | [`DataModel`] | Nested bound data with deep-merge updates |
//! | [`Registry`] | Component definitions keyed by identifier |
//! | [`Resolver`] | Turns literal or path-bound properties into text |
//! | [`Node`] | Resolved presentation tree handed to the presenter |
//! | [`ActionDispatcher`] | Emits [`ActionEvent`]s for user interaction |
//! | [`MessageSource`] | Async transport feeding a renderer through [`connect`] |
//!
//! # Flow
//!
//! 1. **update**: `surfaceUpdate` registers components and `dataModelUpdate`
//!    deep-merges into the data model.
//! 2. **begin**: `beginRendering` sets the root and renders the whole tree.
//! 3. **re-render**: every later data update renders the whole tree again;
//!    the presenter is cleared and handed the new tree each time.
//! 4. **interact**: [`Renderer::interact`] turns clicks, edits, and toggles
//!    into [`ActionEvent`]s for the registered sink and any observers.
//! 5. **delete**: `deleteSurface` forgets everything.
//!
//! # Quick example
//!
//! ```
//! use a2ui_core::{Interaction, NodeKind, Renderer};
//!
//! let mut renderer = Renderer::new();
//! renderer
//!     .process_jsonl(concat!(
//!         r#"{"surfaceUpdate":{"components":["#,
//!         r#"{"id":"root","component":{"Column":{"children":{"explicitList":["hello","go"]}}}},"#,
//!         r#"{"id":"hello","component":{"Text":{"text":{"path":"user.name"}}}},"#,
//!         r#"{"id":"go","component":{"Button":{"label":{"literalString":"Go"},"action":{"name":"go"}}}}"#,
//!         r#"]}}"#, "\n",
//!         r#"{"dataModelUpdate":{"contents":{"user":{"name":"Alice"}}}}"#, "\n",
//!         r#"{"beginRendering":{"root":"root"}}"#, "\n",
//!     ))
//!     .unwrap();
//!
//! let tree = renderer.presented().unwrap();
//! assert!(matches!(
//!     &tree.find("hello").unwrap().kind,
//!     NodeKind::Text { content, .. } if content == "Alice"
//! ));
//!
//! let event = renderer.interact("go", Interaction::Click).unwrap();
//! assert_eq!(event.name, "go");
//! ```

pub mod action;
pub mod component;
pub mod data_model;
pub mod error;
pub mod message;
pub mod node;
pub mod presenter;
pub mod registry;
pub mod render;
pub mod renderer;
pub mod resolve;
pub mod source;
pub mod sources;
pub mod testing;

pub use action::{ActionDescriptor, ActionDispatcher, ActionEvent, ActionSink, Interaction};
pub use component::{BoundValue, ComponentDefinition, ComponentKind};
pub use data_model::{display_text, json_text, DataModel};
pub use error::Error;
pub use message::Message;
pub use node::{Axis, Node, NodeKind, TextRole, UnresolvedReason};
pub use presenter::Presenter;
pub use registry::Registry;
pub use render::{render_tree, Diagnostic, RenderOutput, DEFAULT_MAX_DEPTH};
pub use renderer::{Phase, Renderer, RendererOptions, Surface};
pub use resolve::Resolver;
pub use source::{connect, drive, Connection, Delivery, MessageSource};
pub use sources::{ChannelSource, JsonLines, ServerSentEvents, SseOptions};
