//! Terminal painting for **a2ui** surfaces.
//!
//! [`SurfaceView`] draws the presentation tree produced by
//! [`a2ui_core::Renderer`] with [`ratatui`]. Keyboard interaction is kept in
//! a [`ViewState`] next to the view; it turns key presses into
//! [`a2ui_core::Interaction`]s that the host passes back to the renderer.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`surface_view`] | Stateful widget painting a presentation tree |
//! | [`view_state`] | Focus, text drafts, and key handling |
//! | [`focus`] | [`FocusRing`](focus::FocusRing) over interactive nodes |
//! | [`measure`] | Natural node sizes in cells |
//! | [`chrome`] | Styles, borders, and decorations |
//! | [`status_bar`] | One-row left / center / right status line |
//! | [`testing`] | Off-screen rendering helpers |

pub mod chrome;
pub mod focus;
pub mod measure;
pub mod status_bar;
pub mod surface_view;
pub mod testing;
pub mod view_state;

pub use focus::FocusRing;
pub use measure::{measure, Size};
pub use status_bar::StatusBar;
pub use surface_view::SurfaceView;
pub use view_state::{KeyOutcome, ViewState};
