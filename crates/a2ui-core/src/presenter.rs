use crate::node::Node;
use tokio::sync::watch;

/// The externally supplied surface a [`Renderer`](crate::Renderer) writes
/// into.
///
/// The renderer calls [`clear`](Presenter::clear) before every full render
/// and on surface deletion, then [`present`](Presenter::present) with the
/// freshly built tree. Implementations replace their content wholesale; they
/// never receive partial updates.
pub trait Presenter {
    /// Show `root` as the entire surface.
    fn present(&mut self, root: &Node);

    /// Remove everything from the surface.
    fn clear(&mut self);
}

/// Headless: the renderer's own copy of the tree is the only output.
impl Presenter for () {
    fn present(&mut self, _root: &Node) {}

    fn clear(&mut self) {}
}

/// Publishes the latest tree to any number of async readers.
impl Presenter for watch::Sender<Option<Node>> {
    fn present(&mut self, root: &Node) {
        self.send_replace(Some(root.clone()));
    }

    fn clear(&mut self) {
        self.send_replace(None);
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, root: &Node) {
        (**self).present(root);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
