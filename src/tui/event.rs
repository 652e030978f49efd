use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::overlay::KeyPress;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Quit,
    /// Any other printable key, offered to overlays first.
    Key(KeyPress),
    NextLink,
    PrevLink,
    /// Enter: follow the selected link.
    Activate,
    /// History back (Left / Backspace).
    Back,
    /// History forward (Right).
    Forward,
    ScrollUp,
    ScrollDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).unwrap_or(false) {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            map_key(key_event.code, key_event.modifiers)
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<TuiEvent> {
    match (modifiers, code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
        (KeyModifiers::NONE, KeyCode::Char('q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        (_, KeyCode::Tab) => Some(TuiEvent::NextLink),
        (_, KeyCode::BackTab) => Some(TuiEvent::PrevLink),
        (_, KeyCode::Enter) => Some(TuiEvent::Activate),
        (_, KeyCode::Left | KeyCode::Backspace) => Some(TuiEvent::Back),
        (_, KeyCode::Right) => Some(TuiEvent::Forward),
        (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
        (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
        (_, KeyCode::Char(c)) => Some(TuiEvent::Key(KeyPress {
            key: c,
            alt: modifiers.contains(KeyModifiers::ALT),
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
        })),
        _ => None,
    }
}
