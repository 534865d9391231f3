//! Input mapping from terminal events to game input.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};

use crate::game::InputEvent;
use crate::maze::Direction;

/// Maps a terminal event to a game input event, if it is one the core
/// reacts to. Everything else returns `None` and is dropped.
pub fn map_event(event: &Event) -> Option<InputEvent> {
    match event {
        // Crossterm fires both press and release; only presses count.
        Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
            KeyCode::Up => Some(InputEvent::Direction(Direction::Up)),
            KeyCode::Down => Some(InputEvent::Direction(Direction::Down)),
            KeyCode::Left => Some(InputEvent::Direction(Direction::Left)),
            KeyCode::Right => Some(InputEvent::Direction(Direction::Right)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(InputEvent::PrimaryActivate),
            KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
            _ => None,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(InputEvent::PrimaryActivate)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_map_to_directions() {
        assert_eq!(
            map_event(&press(KeyCode::Up)),
            Some(InputEvent::Direction(Direction::Up))
        );
        assert_eq!(
            map_event(&press(KeyCode::Right)),
            Some(InputEvent::Direction(Direction::Right))
        );
    }

    #[test]
    fn unhandled_keys_are_dropped() {
        assert_eq!(map_event(&press(KeyCode::Char('x'))), None);
        assert_eq!(map_event(&press(KeyCode::Tab)), None);
    }

    #[test]
    fn quit_and_activate_are_mapped() {
        assert_eq!(map_event(&press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(
            map_event(&press(KeyCode::Enter)),
            Some(InputEvent::PrimaryActivate)
        );
    }
}
