//! A three-section status line (left / center / right) rendered as a single
//! row. It is a plain ratatui [`Widget`]; build a new one every frame.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

/// A three-section status bar that fills one row.
///
/// # Example
///
/// ```ignore
/// use a2ui_widgets::status_bar::StatusBar;
/// use ratatui::style::{Color, Style};
///
/// let bar = StatusBar::new()
///     .left("rendering")
///     .center("generation 4")
///     .right("submit <- go")
///     .style(Style::default().bg(Color::DarkGray));
/// frame.render_widget(bar, area);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatusBar<'a> {
    left: Option<Line<'a>>,
    center: Option<Line<'a>>,
    right: Option<Line<'a>>,
    style: Style,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(mut self, content: impl Into<Line<'a>>) -> Self {
        self.left = Some(content.into());
        self
    }

    pub fn center(mut self, content: impl Into<Line<'a>>) -> Self {
        self.center = Some(content.into());
        self
    }

    pub fn right(mut self, content: impl Into<Line<'a>>) -> Self {
        self.right = Some(content.into());
        self
    }

    /// Base style (background color, etc.) for the entire bar.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default().style(self.style).render(area, buf);

        let [left, center, right] = Layout::horizontal([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .areas(area);

        let sections = [
            (self.left, left, Alignment::Left),
            (self.center, center, Alignment::Center),
            (self.right, right, Alignment::Right),
        ];
        for (line, section, alignment) in sections {
            if let Some(line) = line {
                Paragraph::new(line.patch_style(self.style))
                    .alignment(alignment)
                    .render(section, buf);
            }
        }
    }
}
