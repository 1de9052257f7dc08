use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global quit keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        // Enter sends; Shift+Enter inserts a line break instead
        KeyCode::Enter => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.insert_newline();
            } else {
                app.submit();
            }
        }

        // Transcript scrolling
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(app.chat_height / 2),
        KeyCode::PageDown => app.scroll_down(app.chat_height / 2),

        // Input editing
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        KeyCode::Char(c) => app.insert_char(c),

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn typed_characters_reach_the_input() {
        let mut app = App::new(None);

        for c in "hey".chars() {
            handle_event(&mut app, key(KeyCode::Char(c), KeyModifiers::NONE));
        }

        assert_eq!(app.session.input, "hey");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn shift_enter_inserts_a_line_break() {
        let mut app = App::new(None);
        handle_event(&mut app, key(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT));
        handle_event(&mut app, key(KeyCode::Char('b'), KeyModifiers::NONE));

        assert_eq!(app.session.input, "a\nb");
        // Nothing was submitted.
        assert!(app.session.transcript.is_empty());
    }

    #[test]
    fn plain_enter_submits() {
        // No client configured, so the submit surfaces the config error.
        let mut app = App::new(None);
        handle_event(&mut app, key(KeyCode::Char('a'), KeyModifiers::NONE));
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert!(app.toast.is_some());
        assert!(app.session.transcript.is_empty());
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = App::new(None);
        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);

        let mut app = App::new(None);
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn arrow_keys_scroll_the_transcript() {
        let mut app = App::new(None);
        app.chat_scroll = 5;

        handle_event(&mut app, key(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(app.chat_scroll, 4);
        handle_event(&mut app, key(KeyCode::Down, KeyModifiers::NONE));
        assert_eq!(app.chat_scroll, 5);
    }
}
