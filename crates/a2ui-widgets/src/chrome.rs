//! Styles, borders, and fixed decorations shared by the painter and the
//! measurer.

use a2ui_core::{Node, NodeKind, TextRole, UnresolvedReason};
use ratatui::layout::Flex;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Narrowest a text field is drawn, excluding prompt and cursor.
pub const MIN_FIELD_WIDTH: u16 = 12;

/// Prompt drawn in front of text field content.
pub const FIELD_PROMPT: &str = "› ";

/// Gap in cells for a spacing tag: `small` 1, `medium` 2, `large` 3,
/// anything else 1.
pub fn gap(spacing: &str) -> u16 {
    match spacing {
        "medium" => 2,
        "large" => 3,
        _ => 1,
    }
}

/// Flex mode for a row alignment tag.
pub fn row_flex(alignment: &str) -> Flex {
    match alignment {
        "center" => Flex::Center,
        "end" => Flex::End,
        "spaceBetween" => Flex::SpaceBetween,
        "spaceAround" => Flex::SpaceAround,
        _ => Flex::Start,
    }
}

pub fn text_style(role: TextRole) -> Style {
    match role {
        TextRole::H1 => Style::default()
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            .fg(Color::Cyan),
        TextRole::H2 => Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        TextRole::H3 => Style::default().add_modifier(Modifier::BOLD),
        TextRole::Caption => Style::default().fg(Color::DarkGray),
        TextRole::Body => Style::default(),
    }
}

/// Button style from its style tag and interaction state.
pub fn button_style(style: &str, disabled: bool, focused: bool) -> Style {
    if disabled {
        return Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
    }
    let base = match style {
        "primary" => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        "secondary" => Style::default().fg(Color::Gray),
        _ => Style::default(),
    };
    if focused {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    }
}

/// Border type for a card elevation tag.
pub fn card_border(elevation: &str) -> BorderType {
    match elevation {
        "low" => BorderType::Plain,
        "high" => BorderType::Thick,
        _ => BorderType::Rounded,
    }
}

/// A bordered card block.
pub fn card_block(elevation: &str) -> Block<'static> {
    let color = if elevation == "low" {
        Color::DarkGray
    } else {
        Color::Gray
    };
    Block::new()
        .borders(Borders::ALL)
        .border_type(card_border(elevation))
        .border_style(Style::default().fg(color))
}

/// Create a bordered block with focus-dependent border color.
///
/// Uses cyan when focused, dark gray when unfocused.
pub fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    Block::new()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

pub fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

pub fn placeholder_hint_style() -> Style {
    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
}

/// `[x]` or `[ ]`.
pub fn checkbox_mark(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Text shown in place of an image: the alt text when there is one.
pub fn image_text(url: &str, alt: Option<&str>) -> String {
    match alt {
        Some(alt) if !alt.is_empty() => format!("[image: {alt}]"),
        _ => format!("[image: {url}]"),
    }
}

/// Marker text for placeholder nodes; empty for real content.
pub fn placeholder_text(node: &Node) -> String {
    match &node.kind {
        NodeKind::Unresolved { reason } => {
            let what = match reason {
                UnresolvedReason::Missing => "missing",
                UnresolvedReason::Cycle => "cycle",
                UnresolvedReason::Depth => "too deep",
            };
            format!("[{what}: {}]", node.id)
        }
        NodeKind::Unknown { tag } => format!("[unknown {tag}: {}]", node.id),
        _ => String::new(),
    }
}

pub fn placeholder_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC)
}
