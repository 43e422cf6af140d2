//! The presentation tree produced by a render pass.
//!
//! Nodes are plain owned values with every bound property already resolved.
//! A painter (such as the ratatui one in `a2ui-widgets`) only needs this
//! tree; it never looks at the registry or the data model.

use crate::action::ActionDescriptor;
use serde::Serialize;

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Children stacked top to bottom (`Column`).
    Column,
    /// Children laid out left to right (`Row`).
    Row,
}

/// Presentation role of a `Text` component, from its usage hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    H1,
    H2,
    H3,
    Caption,
    #[default]
    Body,
}

impl TextRole {
    /// Map a usage hint to a role; unknown or missing hints are body text.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("h1") => Self::H1,
            Some("h2") => Self::H2,
            Some("h3") => Self::H3,
            Some("caption") => Self::Caption,
            _ => Self::Body,
        }
    }
}

/// Why a branch of the tree could not be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedReason {
    /// No component with this identifier is registered.
    Missing,
    /// The identifier is one of its own ancestors.
    Cycle,
    /// The tree is nested deeper than the configured limit.
    Depth,
}

/// One node of the presentation tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Identifier of the component this node was built from.
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Kind-specific content of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Container {
        axis: Axis,
        alignment: Option<String>,
        spacing: Option<String>,
        children: Vec<Node>,
    },
    Text {
        role: TextRole,
        content: String,
    },
    Button {
        label: String,
        style: String,
        disabled: bool,
        #[serde(skip)]
        action: Option<ActionDescriptor>,
    },
    Card {
        elevation: String,
        child: Option<Box<Node>>,
    },
    Image {
        url: String,
        alt: Option<String>,
    },
    TextField {
        label: Option<String>,
        input_type: String,
        placeholder: Option<String>,
        value: Option<String>,
        #[serde(skip)]
        action: Option<ActionDescriptor>,
    },
    Checkbox {
        label: String,
        checked: bool,
        #[serde(skip)]
        action: Option<ActionDescriptor>,
    },
    List {
        items: Vec<String>,
    },
    /// Placeholder for a branch that could not be expanded.
    Unresolved { reason: UnresolvedReason },
    /// Placeholder for an unrecognized component kind.
    Unknown { tag: String },
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Direct children in paint order.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Container { children, .. } => children,
            NodeKind::Card {
                child: Some(child), ..
            } => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    /// Depth-first, pre-order iterator over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// First node in pre-order whose identifier is `id`.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.walk().find(|node| node.id == id)
    }

    /// Whether the node accepts keyboard focus: enabled buttons, text fields,
    /// and checkboxes.
    pub fn is_interactive(&self) -> bool {
        match &self.kind {
            NodeKind::Button { disabled, .. } => !disabled,
            NodeKind::TextField { .. } | NodeKind::Checkbox { .. } => true,
            _ => false,
        }
    }

    /// Whether this node is a placeholder rather than real content.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Unresolved { .. } | NodeKind::Unknown { .. }
        )
    }

    /// The action descriptor of an interactive node, if any.
    pub fn action(&self) -> Option<&ActionDescriptor> {
        match &self.kind {
            NodeKind::Button { action, .. }
            | NodeKind::TextField { action, .. }
            | NodeKind::Checkbox { action, .. } => action.as_ref(),
            _ => None,
        }
    }
}

/// Iterator returned by [`Node::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(id: &str, content: &str) -> Node {
        Node::new(
            id,
            NodeKind::Text {
                role: TextRole::Body,
                content: content.into(),
            },
        )
    }

    fn column(id: &str, children: Vec<Node>) -> Node {
        Node::new(
            id,
            NodeKind::Container {
                axis: Axis::Column,
                alignment: None,
                spacing: None,
                children,
            },
        )
    }

    #[test]
    fn role_from_hint() {
        assert_eq!(TextRole::from_hint(Some("h1")), TextRole::H1);
        assert_eq!(TextRole::from_hint(Some("caption")), TextRole::Caption);
        assert_eq!(TextRole::from_hint(Some("shout")), TextRole::Body);
        assert_eq!(TextRole::from_hint(None), TextRole::Body);
    }

    #[test]
    fn walk_is_preorder() {
        let card = Node::new(
            "card",
            NodeKind::Card {
                elevation: "medium".into(),
                child: Some(Box::new(text("inner", "x"))),
            },
        );
        let tree = column("root", vec![text("a", "1"), card, text("b", "2")]);
        let ids: Vec<_> = tree.walk().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "card", "inner", "b"]);
    }

    #[test]
    fn find_by_id() {
        let tree = column("root", vec![text("a", "1"), text("b", "2")]);
        assert_eq!(tree.find("b"), Some(&text("b", "2")));
        assert!(tree.find("zzz").is_none());
    }

    #[test]
    fn interactive_nodes() {
        let enabled = Node::new(
            "ok",
            NodeKind::Button {
                label: "OK".into(),
                style: "primary".into(),
                disabled: false,
                action: None,
            },
        );
        let disabled = Node::new(
            "no",
            NodeKind::Button {
                label: "No".into(),
                style: "primary".into(),
                disabled: true,
                action: None,
            },
        );
        assert!(enabled.is_interactive());
        assert!(!disabled.is_interactive());
        assert!(!text("t", "x").is_interactive());
    }

    #[test]
    fn serializes_structurally() {
        let tree = column("root", vec![text("t1", "Hello")]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "id": "root",
                "kind": "container",
                "axis": "column",
                "alignment": null,
                "spacing": null,
                "children": [
                    {"id": "t1", "kind": "text", "role": "body", "content": "Hello"}
                ]
            })
        );
    }
}
