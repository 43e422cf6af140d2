//! Off-screen rendering helpers for tests and snapshots.

use crate::surface_view::SurfaceView;
use crate::view_state::ViewState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

/// Render `view` into a fresh buffer of the given dimensions.
///
/// Returns the raw buffer, which you can inspect cell-by-cell. For a simpler
/// string-based assertion, see [`render_string`].
pub fn render_buffer(view: SurfaceView<'_>, state: &mut ViewState, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    view.render(area, &mut buf, state);
    buf
}

/// Render `view` and return the visible content as a plain string.
///
/// Rows are separated by newlines. Trailing whitespace within each row is
/// preserved.
pub fn render_string(view: SurfaceView<'_>, state: &mut ViewState, width: u16, height: u16) -> String {
    buffer_string(&render_buffer(view, state, width, height))
}

/// The symbols of `buf`, one line per row.
pub fn buffer_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_core::{Node, NodeKind, TextRole};

    #[test]
    fn rows_are_newline_separated() {
        let root = Node::new(
            "t",
            NodeKind::Text {
                role: TextRole::H1,
                content: "a\nb".into(),
            },
        );
        let out = render_string(SurfaceView::new(Some(&root)), &mut ViewState::new(), 2, 2);
        assert_eq!(out, "a \nb ");
    }
}
