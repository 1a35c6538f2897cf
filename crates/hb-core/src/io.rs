//! Terminal collaborator interfaces
//!
//! The engine never draws or reads the terminal itself. It talks to an
//! implementation of [`Ui`]: the real terminal in `hb-tui`, or a scripted
//! one in tests.

use crate::errors::UiError;

/// A key press, as seen by the menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

impl Key {
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// Text colours used by the list renderer and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    White,
    /// Known but unaffordable right now
    Orange,
    /// Unavailable (too hard, forgotten, unknown)
    Slate,
    Yellow,
    LightBlue,
    Red,
}

/// Blocking input
pub trait Input {
    /// Wait for one key
    fn read_key(&mut self) -> Result<Key, UiError>;

    /// Read a line of text; `None` when the player escapes
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, UiError>;

    /// Ask a yes/no question
    fn confirm(&mut self, prompt: &str) -> Result<bool, UiError>;
}

/// Screen output
pub trait Display {
    /// Blank `rows` rows starting at `row`, from column `col` rightwards
    fn clear_region(&mut self, row: u16, col: u16, rows: u16) -> Result<(), UiError>;

    fn put_text(&mut self, row: u16, col: u16, text: &str, color: Color) -> Result<(), UiError>;

    /// Push the current screen so an overlay can be removed later
    fn save_screen(&mut self) -> Result<(), UiError>;

    /// Pop the most recently saved screen
    fn restore_screen(&mut self) -> Result<(), UiError>;

    fn ring_bell(&mut self) -> Result<(), UiError>;

    /// Show a prompt on the top line
    fn prompt(&mut self, text: &str) -> Result<(), UiError>;

    /// Show a message on the top line
    fn message(&mut self, text: &str) -> Result<(), UiError>;
}

/// Everything the menus need from the terminal
pub trait Ui: Input + Display {}

impl<T: Input + Display + ?Sized> Ui for T {}
