//! **a2ui**: render agent-streamed user interfaces in the terminal.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! a2ui = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`a2ui_core`] are available at the crate root
//!   ([`Renderer`], [`Message`], [`Node`], [`connect`], the [`sources`], etc.).
//! * The [`widgets`] module re-exports everything from [`a2ui_widgets`]
//!   ([`SurfaceView`](widgets::SurfaceView), [`ViewState`](widgets::ViewState),
//!   and friends).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! On top of those, this crate adds the full-screen [`Viewer`] and
//! [`logging`] setup.
//!
//! # Quick start
//!
//! ```ignore
//! use a2ui::{sources::JsonLines, Viewer, ViewerOptions};
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), a2ui::ViewerError> {
//!     let mut viewer = Viewer::new(ViewerOptions::default());
//!     viewer.connect(JsonLines::new(BufReader::new(tokio::io::stdin())));
//!     viewer.run().await?;
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod viewer;

pub use a2ui_core::*;
pub use viewer::{Viewer, ViewerError, ViewerOptions};

pub mod widgets {
    pub use a2ui_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
