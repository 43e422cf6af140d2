//! Local interaction state for a painted surface: focus, text drafts, and
//! checkbox overrides.

use crate::focus::FocusRing;
use a2ui_core::{Interaction, Node, NodeKind};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::{HashMap, HashSet};

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// The key means nothing to the surface.
    Ignored,
    /// The key changed local state only (focus or a draft).
    Consumed,
    /// The key completed an interaction on node `id`.
    Interact { id: String, interaction: Interaction },
}

/// State carried by a [`SurfaceView`](crate::SurfaceView) between frames.
///
/// Everything here is local to the terminal. Drafts and checkbox overrides
/// belong to one render generation; when a new generation arrives they are
/// dropped and the freshly rendered values show again. Focus survives by
/// identifier.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    focus: FocusRing,
    fields: HashSet<String>,
    drafts: HashMap<String, String>,
    toggles: HashMap<String, bool>,
    generation: Option<u64>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the state in line with the tree of render `generation`.
    pub fn sync(&mut self, root: Option<&Node>, generation: u64) {
        if self.generation != Some(generation) {
            self.drafts.clear();
            self.toggles.clear();
            self.generation = Some(generation);
        }
        self.focus.sync(root);
        self.fields.clear();
        if let Some(root) = root {
            self.fields.extend(
                root.walk()
                    .filter(|node| matches!(node.kind, NodeKind::TextField { .. }))
                    .map(|node| node.id.clone()),
            );
        }
    }

    pub fn focus(&self) -> &FocusRing {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusRing {
        &mut self.focus
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus.focused_id()
    }

    /// Whether keyboard input currently goes into a text field.
    pub fn is_editing(&self) -> bool {
        self.focused_id()
            .is_some_and(|id| self.fields.contains(id))
    }

    /// Unsent text typed into field `id`.
    pub fn draft(&self, id: &str) -> Option<&str> {
        self.drafts.get(id).map(String::as_str)
    }

    /// Local checked state of checkbox `id`, if toggled since the last render.
    pub fn checked_override(&self, id: &str) -> Option<bool> {
        self.toggles.get(id).copied()
    }

    /// Handle a key press against the tree last synced.
    pub fn handle_key(&mut self, root: &Node, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Ignored;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus.focus_next();
                return KeyOutcome::Consumed;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus.focus_prev();
                return KeyOutcome::Consumed;
            }
            _ => {}
        }

        let Some(node) = self.focused_id().and_then(|id| root.find(id)) else {
            return KeyOutcome::Ignored;
        };
        let id = node.id.clone();
        match &node.kind {
            NodeKind::Button { disabled: false, .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => KeyOutcome::Interact {
                    id,
                    interaction: Interaction::Click,
                },
                _ => KeyOutcome::Ignored,
            },
            NodeKind::Checkbox { checked, .. } => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let next = !self.checked_override(&id).unwrap_or(*checked);
                    self.toggles.insert(id.clone(), next);
                    KeyOutcome::Interact {
                        id,
                        interaction: Interaction::Toggle(next),
                    }
                }
                _ => KeyOutcome::Ignored,
            },
            NodeKind::TextField { value, .. } => {
                let value = value.clone().unwrap_or_default();
                self.edit_field(id, value, key)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn edit_field(&mut self, id: String, value: String, key: KeyEvent) -> KeyOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                let text = self.drafts.get(&id).cloned().unwrap_or(value);
                KeyOutcome::Interact {
                    id,
                    interaction: Interaction::Change(text),
                }
            }
            (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.drafts.insert(id, String::new());
                KeyOutcome::Consumed
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.drafts.entry(id).or_insert(value).push(c);
                KeyOutcome::Consumed
            }
            (KeyCode::Backspace, _) => {
                self.drafts.entry(id).or_insert(value).pop();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }
}
