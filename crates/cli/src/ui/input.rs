//! Translation of crossterm key events

use crossterm::event::{self, KeyEventKind, KeyModifiers};
use s3nav_core::{KeyCode, KeyEvent, Modifiers};

/// Ctrl+C leaves the browser from any page or modal
pub fn is_quit(key: &event::KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && matches!(key.code, event::KeyCode::Char('c'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// The core key for a terminal key press; releases and unmapped keys give `None`
pub fn translate(key: &event::KeyEvent) -> Option<KeyEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    Some(KeyEvent::new(code, modifiers(key.modifiers)))
}

fn modifiers(raw: KeyModifiers) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    if raw.contains(KeyModifiers::SHIFT) {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if raw.contains(KeyModifiers::CONTROL) {
        modifiers = modifiers | Modifiers::CTRL;
    }
    if raw.contains(KeyModifiers::ALT) {
        modifiers = modifiers | Modifiers::ALT;
    }
    modifiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: event::KeyCode, modifiers: KeyModifiers) -> event::KeyEvent {
        event::KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_translate_chars() {
        assert_eq!(
            translate(&press(event::KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(KeyEvent::char('n'))
        );
        assert_eq!(
            translate(&press(event::KeyCode::Char('N'), KeyModifiers::SHIFT)),
            Some(KeyEvent::char('N'))
        );
        assert_eq!(
            translate(&press(event::KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(KeyEvent::ctrl('r'))
        );
    }

    #[test]
    fn test_translate_special_keys() {
        assert_eq!(
            translate(&press(event::KeyCode::Esc, KeyModifiers::NONE)),
            Some(KeyEvent::plain(KeyCode::Esc))
        );
        assert_eq!(
            translate(&press(event::KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(KeyEvent::new(KeyCode::BackTab, Modifiers::SHIFT))
        );
        assert_eq!(
            translate(&press(event::KeyCode::F(5), KeyModifiers::ALT)),
            Some(KeyEvent::new(KeyCode::F(5), Modifiers::ALT))
        );
    }

    #[test]
    fn test_release_and_unmapped_ignored() {
        let release = event::KeyEvent {
            code: event::KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(&release), None);
        assert_eq!(
            translate(&press(event::KeyCode::Insert, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert!(is_quit(&press(
            event::KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit(&press(
            event::KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
        assert!(!is_quit(&press(event::KeyCode::Esc, KeyModifiers::CONTROL)));
    }
}
