//! Key mapping for terminal input
//!
//! Converts crossterm key events to input-line events and app commands.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::controller::InputEvent;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// What a key press means to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Goes to the input controller
    Input(InputEvent),
    /// Insert the clipboard's first line
    PasteClipboard,
    /// Scroll the transcript back one page
    ScrollUp,
    /// Scroll the transcript forward one page
    ScrollDown,
    Quit,
}

/// Key mapper for converting key events to actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent; `None` for keys we ignore
    pub fn map(event: &KeyEvent) -> Option<KeyAction> {
        let mods = Modifiers::from(event.modifiers);

        if mods.contains(Modifiers::CTRL) && !mods.contains(Modifiers::ALT) {
            return Self::map_ctrl(event.code);
        }

        let input = match event.code {
            KeyCode::Char(ch) => InputEvent::Insert(ch),
            KeyCode::Enter => InputEvent::Submit,
            KeyCode::Up => InputEvent::RecallPrevious,
            KeyCode::Down => InputEvent::RecallNext,
            KeyCode::Tab => InputEvent::Complete,
            KeyCode::Backspace => InputEvent::Backspace,
            KeyCode::Delete => InputEvent::Delete,
            KeyCode::Left => InputEvent::CursorLeft,
            KeyCode::Right => InputEvent::CursorRight,
            KeyCode::Home => InputEvent::Home,
            KeyCode::End => InputEvent::End,
            KeyCode::Esc => InputEvent::ClearDraft,
            KeyCode::PageUp => return Some(KeyAction::ScrollUp),
            KeyCode::PageDown => return Some(KeyAction::ScrollDown),
            _ => return None,
        };
        Some(KeyAction::Input(input))
    }

    /// Ctrl combinations (readline-ish)
    fn map_ctrl(code: KeyCode) -> Option<KeyAction> {
        match code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(KeyAction::Quit),
            KeyCode::Char('v') => Some(KeyAction::PasteClipboard),
            KeyCode::Char('a') => Some(KeyAction::Input(InputEvent::Home)),
            KeyCode::Char('e') => Some(KeyAction::Input(InputEvent::End)),
            KeyCode::Char('u') => Some(KeyAction::Input(InputEvent::ClearDraft)),
            KeyCode::Char('p') => Some(KeyAction::Input(InputEvent::RecallPrevious)),
            KeyCode::Char('n') => Some(KeyAction::Input(InputEvent::RecallNext)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    fn map(code: KeyCode, mods: KeyModifiers) -> Option<KeyAction> {
        KeyMapper::map(&key_event(code, mods))
    }

    #[test]
    fn test_modifiers() {
        let mods = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn test_char_keys() {
        assert_eq!(
            map(KeyCode::Char('a'), KeyModifiers::NONE),
            Some(KeyAction::Input(InputEvent::Insert('a')))
        );
        // Shifted characters arrive already uppercased
        assert_eq!(
            map(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(KeyAction::Input(InputEvent::Insert('A')))
        );
    }

    #[test]
    fn test_terminal_keys() {
        assert_eq!(
            map(KeyCode::Enter, KeyModifiers::NONE),
            Some(KeyAction::Input(InputEvent::Submit))
        );
        assert_eq!(
            map(KeyCode::Up, KeyModifiers::NONE),
            Some(KeyAction::Input(InputEvent::RecallPrevious))
        );
        assert_eq!(
            map(KeyCode::Down, KeyModifiers::NONE),
            Some(KeyAction::Input(InputEvent::RecallNext))
        );
        assert_eq!(
            map(KeyCode::Tab, KeyModifiers::NONE),
            Some(KeyAction::Input(InputEvent::Complete))
        );
        assert_eq!(map(KeyCode::PageUp, KeyModifiers::NONE), Some(KeyAction::ScrollUp));
        assert_eq!(map(KeyCode::F(1), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_ctrl_keys() {
        assert_eq!(map(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(KeyAction::Quit));
        assert_eq!(
            map(KeyCode::Char('v'), KeyModifiers::CONTROL),
            Some(KeyAction::PasteClipboard)
        );
        assert_eq!(
            map(KeyCode::Char('u'), KeyModifiers::CONTROL),
            Some(KeyAction::Input(InputEvent::ClearDraft))
        );
        assert_eq!(map(KeyCode::Char('z'), KeyModifiers::CONTROL), None);
    }
}
