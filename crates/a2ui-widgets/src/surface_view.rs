//! The ratatui painter for presentation trees.

use crate::chrome;
use crate::measure::measure;
use crate::view_state::ViewState;
use a2ui_core::{Axis, Node, NodeKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, StatefulWidget, Widget};

/// Paints a presentation tree into an area.
///
/// Columns stack children top to bottom at their measured height; rows split
/// the width with a flex mode taken from the alignment tag. Anything that
/// does not fit is clipped. Focus, drafts, and checkbox overrides come from
/// the [`ViewState`], which is synced against the tree on every render.
///
/// # Example
///
/// ```ignore
/// let view = SurfaceView::new(renderer.presented())
///     .generation(renderer.generation())
///     .block(chrome::focus_block("surface", true));
/// frame.render_stateful_widget(view, frame.area(), &mut view_state);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SurfaceView<'a> {
    root: Option<&'a Node>,
    generation: u64,
    block: Option<Block<'a>>,
}

impl<'a> SurfaceView<'a> {
    pub fn new(root: Option<&'a Node>) -> Self {
        Self {
            root,
            generation: 0,
            block: None,
        }
    }

    /// Render generation of `root`; a change drops local drafts.
    pub fn generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Wrap the surface in a block.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for SurfaceView<'_> {
    type State = ViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ViewState) {
        let area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        state.sync(self.root, self.generation);
        if let Some(root) = self.root {
            Painter { buf, state }.paint(root, area);
        }
    }
}

struct Painter<'b> {
    buf: &'b mut Buffer,
    state: &'b ViewState,
}

impl Painter<'_> {
    fn paint(&mut self, node: &Node, area: Rect) {
        if area.is_empty() {
            return;
        }
        let focused = self.state.focus().is_focused(&node.id);
        match &node.kind {
            NodeKind::Container {
                axis: Axis::Column,
                alignment,
                spacing,
                children,
            } => self.paint_column(children, alignment.as_deref(), spacing.as_deref(), area),
            NodeKind::Container {
                axis: Axis::Row,
                alignment,
                spacing,
                children,
            } => self.paint_row(children, alignment.as_deref(), spacing.as_deref(), area),
            NodeKind::Text { role, content } => {
                let style = chrome::text_style(*role);
                for (line, y) in content.lines().zip(area.top()..area.bottom()) {
                    self.put(area.x, y, line, area, style);
                }
            }
            NodeKind::Button {
                label,
                style,
                disabled,
                ..
            } => {
                let style = chrome::button_style(style, *disabled, focused);
                self.put(area.x, area.y, &format!("[ {label} ]"), area, style);
            }
            NodeKind::Card { elevation, child } => {
                let block = chrome::card_block(elevation);
                let inner = block.inner(area);
                block.render(area, self.buf);
                if let Some(child) = child {
                    self.paint(child, inner);
                }
            }
            NodeKind::Image { url, alt } => {
                let text = chrome::image_text(url, alt.as_deref());
                self.put(area.x, area.y, &text, area, chrome::placeholder_hint_style());
            }
            NodeKind::TextField {
                label,
                input_type,
                placeholder,
                value,
                ..
            } => {
                let mut y = area.y;
                if let Some(label) = label {
                    let style = Style::default().add_modifier(Modifier::BOLD);
                    self.put(area.x, y, label, area, style);
                    y = y.saturating_add(1);
                }
                let content = self
                    .state
                    .draft(&node.id)
                    .or(value.as_deref())
                    .unwrap_or_default();
                let shown = if input_type == "password" {
                    "•".repeat(content.chars().count())
                } else {
                    content.to_string()
                };
                let field = chrome::field_style(focused);
                let mut x = self.put(area.x, y, chrome::FIELD_PROMPT, area, field);
                x = self.put(x, y, &shown, area, field.add_modifier(Modifier::UNDERLINED));
                if focused {
                    x = self.put(x, y, "_", area, field.add_modifier(Modifier::SLOW_BLINK));
                }
                if shown.is_empty() {
                    if let Some(placeholder) = placeholder {
                        self.put(x, y, placeholder, area, chrome::placeholder_hint_style());
                    }
                }
            }
            NodeKind::Checkbox { label, checked, .. } => {
                let checked = self.state.checked_override(&node.id).unwrap_or(*checked);
                let mark_style = if focused {
                    chrome::field_style(true).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                let x = self.put(area.x, area.y, chrome::checkbox_mark(checked), area, mark_style);
                self.put(x, area.y, &format!(" {label}"), area, Style::default());
            }
            NodeKind::List { items } => {
                for (item, y) in items.iter().zip(area.top()..area.bottom()) {
                    self.put(area.x, y, &format!("• {item}"), area, Style::default());
                }
            }
            NodeKind::Unresolved { .. } | NodeKind::Unknown { .. } => {
                let text = chrome::placeholder_text(node);
                self.put(area.x, area.y, &text, area, chrome::placeholder_style());
            }
        }
    }

    fn paint_column(
        &mut self,
        children: &[Node],
        alignment: Option<&str>,
        spacing: Option<&str>,
        area: Rect,
    ) {
        let gap = spacing.map_or(0, chrome::gap);
        let mut y = area.y;
        for child in children {
            if y >= area.bottom() {
                break;
            }
            let size = measure(child);
            let height = size.height.min(area.bottom() - y);
            let width = size.width.min(area.width);
            let x = match alignment {
                Some("center") => area.x + (area.width - width) / 2,
                Some("end") => area.right() - width,
                _ => area.x,
            };
            let width = match alignment {
                Some("center" | "end") => width,
                _ => area.width,
            };
            self.paint(child, Rect::new(x, y, width, height));
            y = y.saturating_add(height).saturating_add(gap);
        }
    }

    fn paint_row(
        &mut self,
        children: &[Node],
        alignment: Option<&str>,
        spacing: Option<&str>,
        area: Rect,
    ) {
        let gap = chrome::gap(spacing.unwrap_or_default());
        let constraints: Vec<Constraint> = match alignment {
            Some(_) => children
                .iter()
                .map(|child| Constraint::Length(measure(child).width))
                .collect(),
            None => children.iter().map(|_| Constraint::Fill(1)).collect(),
        };
        let flex = chrome::row_flex(alignment.unwrap_or_default());
        let rects = Layout::horizontal(constraints)
            .flex(flex)
            .spacing(gap)
            .split(area);
        for (child, rect) in children.iter().zip(rects.iter()) {
            self.paint(child, *rect);
        }
    }

    /// Write `text` at (`x`, `y`) clipped to `area`; returns the column after
    /// the last cell written.
    fn put(&mut self, x: u16, y: u16, text: &str, area: Rect, style: Style) -> u16 {
        if y < area.top() || y >= area.bottom() || x >= area.right() {
            return x;
        }
        let max_width = usize::from(area.right() - x);
        let (end, _) = self.buf.set_stringn(x, y, text, max_width, style);
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{buffer_string, render_string};
    use a2ui_core::{ActionDescriptor, Renderer, TextRole, UnresolvedReason};
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;
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

    fn container(axis: Axis, alignment: Option<&str>, children: Vec<Node>) -> Node {
        Node::new(
            "c",
            NodeKind::Container {
                axis,
                alignment: alignment.map(String::from),
                spacing: None,
                children,
            },
        )
    }

    fn lines(output: &str) -> Vec<&str> {
        output.lines().map(str::trim_end).collect()
    }

    #[test]
    fn column_stacks_children() {
        let root = container(Axis::Column, None, vec![text("a", "first"), text("b", "second")]);
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 10, 3);
        assert_eq!(lines(&out), vec!["first", "second", ""]);
    }

    #[test]
    fn column_alignment_center_and_end() {
        let centered = container(Axis::Column, Some("center"), vec![text("a", "ab")]);
        let out = render_string(SurfaceView::new(Some(&centered)), &mut ViewState::new(), 6, 1);
        assert_eq!(out, "  ab  ");

        let end = container(Axis::Column, Some("end"), vec![text("a", "ab")]);
        let out = render_string(SurfaceView::new(Some(&end)), &mut ViewState::new(), 6, 1);
        assert_eq!(out, "    ab");
    }

    #[test]
    fn row_places_children_side_by_side() {
        let root = container(Axis::Row, Some("start"), vec![text("a", "ab"), text("b", "cd")]);
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 8, 1);
        assert_eq!(out, "ab cd   ");

        let root = container(Axis::Row, Some("end"), vec![text("a", "ab"), text("b", "cd")]);
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 8, 1);
        assert_eq!(out, "   ab cd");
    }

    #[test]
    fn card_border_follows_elevation() {
        let card = |elevation: &str| {
            Node::new(
                "card",
                NodeKind::Card {
                    elevation: elevation.into(),
                    child: Some(Box::new(text("t", "hi"))),
                },
            )
        };
        let out = render_string(SurfaceView::new(Some(&card("medium"))), &mut ViewState::new(), 4, 3);
        assert_eq!(lines(&out), vec!["╭──╮", "│hi│", "╰──╯"]);

        let out = render_string(SurfaceView::new(Some(&card("low"))), &mut ViewState::new(), 4, 3);
        assert_eq!(lines(&out)[0], "┌──┐");

        let thick = ratatui::symbols::border::THICK.top_left;
        let out = render_string(SurfaceView::new(Some(&card("high"))), &mut ViewState::new(), 4, 3);
        assert!(out.starts_with(thick));
    }

    #[test]
    fn placeholders_are_marked() {
        let root = container(
            Axis::Column,
            None,
            vec![
                Node::new(
                    "gone",
                    NodeKind::Unresolved {
                        reason: UnresolvedReason::Missing,
                    },
                ),
                Node::new("f", NodeKind::Unknown { tag: "Foo".into() }),
                text("ok", "still here"),
            ],
        );
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 20, 3);
        assert_eq!(lines(&out), vec!["[missing: gone]", "[unknown Foo: f]", "still here"]);
    }

    #[test]
    fn output_is_clipped() {
        let root = container(
            Axis::Column,
            None,
            vec![text("a", "a long line of text"), text("b", "b"), text("c", "c")],
        );
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 6, 2);
        assert_eq!(lines(&out), vec!["a long", "b"]);
    }

    #[test]
    fn interactive_widgets() {
        let root = container(
            Axis::Column,
            None,
            vec![
                Node::new(
                    "go",
                    NodeKind::Button {
                        label: "Go".into(),
                        style: "primary".into(),
                        disabled: false,
                        action: Some(ActionDescriptor::new("go")),
                    },
                ),
                Node::new(
                    "ok",
                    NodeKind::Checkbox {
                        label: "Agree".into(),
                        checked: true,
                        action: None,
                    },
                ),
                Node::new(
                    "list",
                    NodeKind::List {
                        items: vec!["1".into(), "\"two\"".into()],
                    },
                ),
            ],
        );
        let mut state = ViewState::new();
        let out = render_string(SurfaceView::new(Some(&root)), &mut state, 12, 4);
        assert_eq!(lines(&out), vec!["[ Go ]", "[x] Agree", "• 1", "• \"two\""]);
        assert_eq!(state.focused_id(), Some("go"));
    }

    #[test]
    fn text_field_shows_draft_placeholder_and_mask() {
        let field = |input_type: &str, value: Option<&str>| {
            Node::new(
                "f",
                NodeKind::TextField {
                    label: None,
                    input_type: input_type.into(),
                    placeholder: Some("type here".into()),
                    value: value.map(String::from),
                    action: None,
                },
            )
        };
        // the only interactive node takes focus, so the cursor shows
        let root = container(Axis::Column, None, vec![field("text", None)]);
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 16, 1);
        assert_eq!(out.trim_end(), "› _type here");

        let mut state = ViewState::new();
        state.sync(Some(&root), 0);
        state.handle_key(
            &root,
            crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char('h')),
        );
        let out = render_string(SurfaceView::new(Some(&root)), &mut state, 16, 1);
        assert_eq!(out.trim_end(), "› h_");

        let root = container(Axis::Column, None, vec![field("password", Some("abc"))]);
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 16, 1);
        assert_eq!(out.trim_end(), "› •••_");
    }

    #[test]
    fn focused_button_is_reversed() {
        let root = Node::new(
            "go",
            NodeKind::Button {
                label: "Go".into(),
                style: "primary".into(),
                disabled: false,
                action: None,
            },
        );
        let mut state = ViewState::new();
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        SurfaceView::new(Some(&root)).render(area, &mut buf, &mut state);
        let cell = &buf[(0u16, 0u16)];
        assert!(cell.modifier.contains(Modifier::REVERSED));
        assert_eq!(cell.fg, Color::Cyan);
    }

    #[test]
    fn draws_renderer_output_through_terminal() {
        let mut renderer = Renderer::new();
        renderer.process(a2ui_core::Message::from_value(&json!({"surfaceUpdate": {"components": [
            {"id": "r", "component": {"Column": {"children": {"explicitList": ["t1"]}}}},
            {"id": "t1", "component": {"Text": {"text": {"literalString": "Hello"}}}}
        ]}})));
        renderer.process(a2ui_core::Message::from_value(
            &json!({"beginRendering": {"root": "r"}}),
        ));

        let mut terminal = Terminal::new(TestBackend::new(12, 3)).unwrap();
        let mut state = ViewState::new();
        terminal
            .draw(|frame| {
                let view = SurfaceView::new(renderer.presented())
                    .generation(renderer.generation())
                    .block(Block::bordered());
                frame.render_stateful_widget(view, frame.area(), &mut state);
            })
            .unwrap();
        let out = buffer_string(terminal.backend().buffer());
        assert_eq!(lines(&out)[1], "│Hello     │");
    }

    #[test]
    fn empty_surface_draws_nothing() {
        let out = render_string(SurfaceView::new(None), &mut ViewState::new(), 4, 1);
        assert_eq!(out, "    ");
    }
}
