//! Helpers for exercising a [`Renderer`](crate::Renderer) without a terminal.

use crate::node::Node;
use crate::presenter::Presenter;

/// One call received by a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Present(Node),
    Clear,
}

/// A presenter that records every call it receives.
///
/// # Example
///
/// ```
/// use a2ui_core::testing::{PresenterCall, Recorder};
/// use a2ui_core::{Renderer, RendererOptions};
///
/// let mut renderer = Renderer::with_presenter(Recorder::default(), RendererOptions::default());
/// renderer
///     .process_str(r#"{"beginRendering":{"root":"r"}}"#)
///     .unwrap();
/// assert_eq!(renderer.presenter().presents().count(), 1);
/// assert_eq!(renderer.presenter().calls()[0], PresenterCall::Clear);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Vec<PresenterCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in arrival order.
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Only the presented trees, in arrival order.
    pub fn presents(&self) -> impl Iterator<Item = &Node> {
        self.calls.iter().filter_map(|call| match call {
            PresenterCall::Present(node) => Some(node),
            PresenterCall::Clear => None,
        })
    }

    /// The most recently presented tree, unless cleared since.
    pub fn current(&self) -> Option<&Node> {
        match self.calls.last()? {
            PresenterCall::Present(node) => Some(node),
            PresenterCall::Clear => None,
        }
    }

    /// Forget recorded calls.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Presenter for Recorder {
    fn present(&mut self, root: &Node) {
        self.calls.push(PresenterCall::Present(root.clone()));
    }

    fn clear(&mut self) {
        self.calls.push(PresenterCall::Clear);
    }
}
