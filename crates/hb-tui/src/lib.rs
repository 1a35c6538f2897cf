//! hb-tui: terminal front-end for the power menus
//!
//! Implements the engine's `Ui` over ratatui and routes top-level keys to
//! the power dispatcher.

pub mod app;
pub mod input;
pub mod screen;
pub mod theme;

pub use app::App;
pub use input::Command;
pub use screen::{CrosstermEvents, TerminalUi};
pub use theme::Theme;
