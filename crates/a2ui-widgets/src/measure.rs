//! Natural size of presentation nodes in terminal cells.
//!
//! Widths are display widths (`unicode-width`), so wide characters count as
//! two cells. Sizes saturate at `u16::MAX`.

use crate::chrome;
use a2ui_core::{Axis, Node, NodeKind};
use unicode_width::UnicodeWidthStr;

/// Width and height in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Display width of `text` in cells.
pub fn text_width(text: &str) -> u16 {
    clamp(text.width())
}

/// Width of the widest line and the number of lines (at least one).
pub fn block_size(text: &str) -> Size {
    let width = text.lines().map(text_width).max().unwrap_or(0);
    let height = clamp(text.lines().count().max(1));
    Size::new(width, height)
}

/// The size `node` would like to occupy.
pub fn measure(node: &Node) -> Size {
    match &node.kind {
        NodeKind::Container {
            axis,
            spacing,
            children,
            ..
        } => {
            let sizes: Vec<Size> = children.iter().map(measure).collect();
            let gaps = children.len().saturating_sub(1);
            match axis {
                Axis::Column => {
                    let gap = spacing.as_deref().map_or(0, chrome::gap);
                    Size::new(
                        sizes.iter().map(|s| s.width).max().unwrap_or(0),
                        sizes
                            .iter()
                            .fold(0u16, |acc, s| acc.saturating_add(s.height))
                            .saturating_add(gap.saturating_mul(clamp(gaps))),
                    )
                }
                Axis::Row => {
                    let gap = chrome::gap(spacing.as_deref().unwrap_or_default());
                    Size::new(
                        sizes
                            .iter()
                            .fold(0u16, |acc, s| acc.saturating_add(s.width))
                            .saturating_add(gap.saturating_mul(clamp(gaps))),
                        sizes.iter().map(|s| s.height).max().unwrap_or(0),
                    )
                }
            }
        }
        NodeKind::Text { content, .. } => block_size(content),
        NodeKind::Button { label, .. } => Size::new(text_width(label).saturating_add(4), 1),
        NodeKind::Card { child, .. } => {
            let inner = child.as_deref().map(measure).unwrap_or_default();
            Size::new(inner.width.saturating_add(2), inner.height.saturating_add(2))
        }
        NodeKind::Image { url, alt } => {
            Size::new(text_width(&chrome::image_text(url, alt.as_deref())), 1)
        }
        NodeKind::TextField {
            label,
            placeholder,
            value,
            ..
        } => {
            let content = text_width(value.as_deref().unwrap_or_default())
                .max(text_width(placeholder.as_deref().unwrap_or_default()))
                .max(chrome::MIN_FIELD_WIDTH);
            let label_width = label.as_deref().map_or(0, text_width);
            let height = if label.is_some() { 2 } else { 1 };
            // prompt plus trailing cursor cell
            Size::new(label_width.max(content.saturating_add(3)), height)
        }
        NodeKind::Checkbox { label, .. } => Size::new(text_width(label).saturating_add(4), 1),
        NodeKind::List { items } => Size::new(
            items
                .iter()
                .map(|item| text_width(item).saturating_add(2))
                .max()
                .unwrap_or(0),
            clamp(items.len()),
        ),
        NodeKind::Unresolved { .. } | NodeKind::Unknown { .. } => {
            Size::new(text_width(&chrome::placeholder_text(node)), 1)
        }
    }
}

fn clamp(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_core::TextRole;

    fn text(content: &str) -> Node {
        Node::new(
            "t",
            NodeKind::Text {
                role: TextRole::Body,
                content: content.into(),
            },
        )
    }

    fn container(axis: Axis, spacing: Option<&str>, children: Vec<Node>) -> Node {
        Node::new(
            "c",
            NodeKind::Container {
                axis,
                alignment: None,
                spacing: spacing.map(String::from),
                children,
            },
        )
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(text_width("abc"), 3);
        assert_eq!(text_width("日本"), 4);
    }

    #[test]
    fn multi_line_text() {
        assert_eq!(measure(&text("one\nthree")), Size::new(5, 2));
        assert_eq!(measure(&text("")), Size::new(0, 1));
    }

    #[test]
    fn column_stacks_and_row_sums() {
        let column = container(Axis::Column, None, vec![text("ab"), text("abcd")]);
        assert_eq!(measure(&column), Size::new(4, 2));

        // untagged rows keep a one-cell gap
        let row = container(Axis::Row, None, vec![text("ab"), text("abcd")]);
        assert_eq!(measure(&row), Size::new(7, 1));

        let wide = container(Axis::Row, Some("large"), vec![text("ab"), text("abcd")]);
        assert_eq!(measure(&wide), Size::new(9, 1));
    }

    #[test]
    fn card_adds_border() {
        let card = Node::new(
            "card",
            NodeKind::Card {
                elevation: "medium".into(),
                child: Some(Box::new(text("hi"))),
            },
        );
        assert_eq!(measure(&card), Size::new(4, 3));
    }

    #[test]
    fn text_field_height_follows_label() {
        let field = |label: Option<&str>| {
            Node::new(
                "f",
                NodeKind::TextField {
                    label: label.map(String::from),
                    input_type: "text".into(),
                    placeholder: None,
                    value: None,
                    action: None,
                },
            )
        };
        assert_eq!(measure(&field(None)).height, 1);
        assert_eq!(measure(&field(Some("Name"))).height, 2);
    }
}
