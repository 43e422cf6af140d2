//! Expansion of registered components into a presentation tree.
//!
//! [`render_tree`] walks from a root identifier, looks each identifier up in
//! the [`Registry`], and hands the definition to a per-kind builder. Builders
//! are plain functions of the identifier, the property bag, a [`Resolver`],
//! and a callback that renders child identifiers. Nothing in here fails:
//! missing identifiers, cycles, and unknown kinds all become placeholder nodes
//! and [`Diagnostic`]s.

use crate::component::{
    ButtonProps, CardProps, CheckboxProps, ComponentKind, ContainerProps, ImageProps, ListProps,
    TextFieldProps, TextProps,
};
use crate::data_model::{json_text, DataModel};
use crate::node::{Axis, Node, NodeKind, TextRole, UnresolvedReason};
use crate::registry::Registry;
use crate::resolve::Resolver;
use serde_json::Value;

/// Default nesting limit for [`render_tree`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// A recoverable problem found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The identifier is not registered.
    UnresolvedComponent { id: String },
    /// The identifier refers back to one of its ancestors.
    CyclicReference { id: String },
    /// Nesting exceeded the depth limit at this identifier.
    DepthExceeded { id: String },
    /// The component's kind tag is not one the renderer knows.
    UnknownComponentKind { id: String, tag: String },
    /// A data path resolved to nothing and was shown as empty.
    UnboundPath { path: String },
}

/// The result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Render the subtree rooted at `root_id`.
///
/// Pure with respect to its inputs: the same registry, data, and root always
/// give structurally identical output.
pub fn render_tree(
    root_id: &str,
    registry: &Registry,
    data: &DataModel,
    max_depth: usize,
) -> RenderOutput {
    let resolver = Resolver::new(data);
    let mut walker = TreeWalker {
        registry,
        resolver: &resolver,
        ancestors: Vec::new(),
        max_depth,
        diagnostics: Vec::new(),
    };
    let root = walker.render(root_id);
    let mut diagnostics = walker.diagnostics;
    diagnostics.extend(
        resolver
            .unbound_paths()
            .into_iter()
            .map(|path| Diagnostic::UnboundPath { path }),
    );
    RenderOutput { root, diagnostics }
}

struct TreeWalker<'a> {
    registry: &'a Registry,
    resolver: &'a Resolver<'a>,
    ancestors: Vec<&'a str>,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TreeWalker<'a> {
    fn render(&mut self, id: &str) -> Node {
        let registry = self.registry;
        let Some(definition) = registry.lookup(id) else {
            tracing::warn!(id, "component not found");
            self.diagnostics.push(Diagnostic::UnresolvedComponent { id: id.into() });
            return unresolved(id, UnresolvedReason::Missing);
        };
        if self.ancestors.contains(&definition.id.as_str()) {
            tracing::warn!(id, "component references itself");
            self.diagnostics.push(Diagnostic::CyclicReference { id: id.into() });
            return unresolved(id, UnresolvedReason::Cycle);
        }
        if self.ancestors.len() >= self.max_depth {
            tracing::warn!(id, depth = self.ancestors.len(), "component tree too deep");
            self.diagnostics.push(Diagnostic::DepthExceeded { id: id.into() });
            return unresolved(id, UnresolvedReason::Depth);
        }

        self.ancestors.push(&definition.id);
        let resolver = self.resolver;
        let mut child = |child_id: &str| self.render(child_id);
        let node = match &definition.kind {
            ComponentKind::Column(props) => build_container(id, Axis::Column, props, &mut child),
            ComponentKind::Row(props) => build_container(id, Axis::Row, props, &mut child),
            ComponentKind::Text(props) => build_text(id, props, resolver),
            ComponentKind::Button(props) => build_button(id, props, resolver),
            ComponentKind::Card(props) => build_card(id, props, &mut child),
            ComponentKind::Image(props) => build_image(id, props, resolver),
            ComponentKind::TextField(props) => build_text_field(id, props, resolver),
            ComponentKind::Checkbox(props) => build_checkbox(id, props, resolver),
            ComponentKind::List(props) => build_list(id, props, resolver),
            ComponentKind::Unknown { tag } => {
                tracing::warn!(id, tag = %tag, "unknown component kind");
                self.diagnostics.push(Diagnostic::UnknownComponentKind {
                    id: id.into(),
                    tag: tag.clone(),
                });
                Node::new(id, NodeKind::Unknown { tag: tag.clone() })
            }
        };
        self.ancestors.pop();
        node
    }
}

fn unresolved(id: &str, reason: UnresolvedReason) -> Node {
    Node::new(id, NodeKind::Unresolved { reason })
}

fn build_container(
    id: &str,
    axis: Axis,
    props: &ContainerProps,
    child: &mut impl FnMut(&str) -> Node,
) -> Node {
    let children = props
        .children
        .explicit_list
        .iter()
        .map(|child_id| child(child_id))
        .collect();
    Node::new(
        id,
        NodeKind::Container {
            axis,
            alignment: props.alignment.clone(),
            spacing: props.spacing.clone(),
            children,
        },
    )
}

fn build_text(id: &str, props: &TextProps, resolver: &Resolver<'_>) -> Node {
    Node::new(
        id,
        NodeKind::Text {
            role: TextRole::from_hint(props.usage_hint.as_deref()),
            content: resolver.resolve(props.text.as_ref()),
        },
    )
}

fn build_button(id: &str, props: &ButtonProps, resolver: &Resolver<'_>) -> Node {
    Node::new(
        id,
        NodeKind::Button {
            label: resolver.resolve(props.label.as_ref()),
            style: props.style.clone().unwrap_or_else(|| "primary".into()),
            disabled: resolver.resolve_flag(props.disabled.as_ref()),
            action: props.action.clone(),
        },
    )
}

fn build_card(id: &str, props: &CardProps, child: &mut impl FnMut(&str) -> Node) -> Node {
    Node::new(
        id,
        NodeKind::Card {
            elevation: props.elevation.clone().unwrap_or_else(|| "medium".into()),
            child: props.child.as_deref().map(|child_id| Box::new(child(child_id))),
        },
    )
}

fn build_image(id: &str, props: &ImageProps, resolver: &Resolver<'_>) -> Node {
    Node::new(
        id,
        NodeKind::Image {
            url: resolver.resolve(props.url.as_ref()),
            alt: resolver.resolve_opt(props.alt.as_ref()),
        },
    )
}

fn build_text_field(id: &str, props: &TextFieldProps, resolver: &Resolver<'_>) -> Node {
    Node::new(
        id,
        NodeKind::TextField {
            label: resolver.resolve_opt(props.label.as_ref()),
            input_type: props.input_type.clone().unwrap_or_else(|| "text".into()),
            placeholder: resolver.resolve_opt(props.placeholder.as_ref()),
            value: resolver.resolve_opt(props.value.as_ref()),
            action: props.action.clone(),
        },
    )
}

fn build_checkbox(id: &str, props: &CheckboxProps, resolver: &Resolver<'_>) -> Node {
    Node::new(
        id,
        NodeKind::Checkbox {
            label: resolver.resolve(props.label.as_ref()),
            checked: resolver.resolve_flag(props.checked.as_ref()),
            action: props.action.clone(),
        },
    )
}

fn build_list(id: &str, props: &ListProps, resolver: &Resolver<'_>) -> Node {
    let source = props
        .children
        .template
        .as_ref()
        .and_then(|template| resolver.resolve_raw(template.source.as_ref()));
    let items = match source {
        Some(Value::Array(elements)) => elements.iter().map(json_text).collect(),
        _ => Vec::new(),
    };
    Node::new(id, NodeKind::List { items })
}
