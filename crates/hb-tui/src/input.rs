//! Input handling: crossterm key events to menu keys and game commands

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use hb_core::io::Key;

/// Commands the front-end understands at the top level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Class power: spells, blue magic, eaten devices or smithing
    Cast,
    /// Read spell descriptions
    Browse,
    /// Racial powers and mutations
    RacialPower,
    /// An item command ('q', 'r', 'E', 'u', 'a', 'z', 'w')
    UseItem(char),
    /// Repeat the last command with its last choice
    Repeat,
    /// Forget every remembered choice
    CancelRepeat,
    /// Switch between typed and menu navigation
    ToggleMenu,
    Quit,
}

/// Convert a terminal key event to a menu key.
///
/// Releases and modifier-only events are ignored; Ctrl-C and Ctrl-G act as
/// Escape.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c' | 'g') => Some(Key::Escape),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        _ => None,
    }
}

/// Top-level key bindings
pub fn key_to_command(key: Key) -> Option<Command> {
    match key {
        Key::Char('m') => Some(Command::Cast),
        Key::Char('b') => Some(Command::Browse),
        Key::Char('U') => Some(Command::RacialPower),
        Key::Char(c @ ('q' | 'r' | 'E' | 'u' | 'a' | 'z' | 'w')) => Some(Command::UseItem(c)),
        Key::Char('n') => Some(Command::Repeat),
        Key::Char('N') => Some(Command::CancelRepeat),
        Key::Char('=') => Some(Command::ToggleMenu),
        Key::Char('Q') | Key::Escape => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_plain_keys() {
        assert_eq!(map_key(press(KeyCode::Char('a'))), Some(Key::Char('a')));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Key::Escape));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Key::Enter));
        assert_eq!(map_key(press(KeyCode::PageDown)), Some(Key::PageDown));
        assert_eq!(map_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_map_shifted_letters_keep_case() {
        let event = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(map_key(event), Some(Key::Char('A')));
    }

    #[test]
    fn test_map_control_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Key::Escape));
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_x), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let event = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(event), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(key_to_command(Key::Char('m')), Some(Command::Cast));
        assert_eq!(key_to_command(Key::Char('q')), Some(Command::UseItem('q')));
        assert_eq!(key_to_command(Key::Char('E')), Some(Command::UseItem('E')));
        assert_eq!(key_to_command(Key::Escape), Some(Command::Quit));
        assert_eq!(key_to_command(Key::Char('x')), None);
    }
}
