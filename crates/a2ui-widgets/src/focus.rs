//! Keyboard focus across the interactive nodes of a presentation tree.

use a2ui_core::Node;

/// Cycles focus across interactive node identifiers in tree order.
///
/// The ring is rebuilt from each new tree with [`sync`](FocusRing::sync). A
/// focused identifier that survives the rebuild stays focused; otherwise
/// focus falls back to the nearest earlier slot.
#[derive(Debug, Clone, Default)]
pub struct FocusRing {
    ids: Vec<String>,
    focused: Option<usize>,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from `root`'s interactive nodes.
    pub fn sync(&mut self, root: Option<&Node>) {
        let previous = self.focused_id().map(str::to_owned);
        let previous_index = self.focused;

        self.ids.clear();
        if let Some(root) = root {
            for node in root.walk().filter(|node| node.is_interactive()) {
                if !self.ids.iter().any(|id| *id == node.id) {
                    self.ids.push(node.id.clone());
                }
            }
        }

        self.focused = if self.ids.is_empty() {
            None
        } else if let Some(index) = previous
            .as_deref()
            .and_then(|id| self.ids.iter().position(|candidate| candidate == id))
        {
            Some(index)
        } else {
            Some(previous_index.unwrap_or(0).min(self.ids.len() - 1))
        };
    }

    /// Identifier of the focused node.
    pub fn focused_id(&self) -> Option<&str> {
        self.focused.map(|index| self.ids[index].as_str())
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_id() == Some(id)
    }

    /// Move focus to the next node, wrapping around after the last.
    pub fn focus_next(&mut self) {
        let len = self.ids.len();
        if len > 0 {
            self.focused = Some(self.focused.map_or(0, |index| (index + 1) % len));
        }
    }

    /// Move focus to the previous node, wrapping around before the first.
    pub fn focus_prev(&mut self) {
        let len = self.ids.len();
        if len > 0 {
            self.focused = Some(self.focused.map_or(len - 1, |index| (index + len - 1) % len));
        }
    }

    /// Focus `id` if it is in the ring. Returns whether focus moved there.
    pub fn focus(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|candidate| candidate == id) {
            Some(index) => {
                self.focused = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
