use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Priority;
use crate::tui::app::{App, Mode, PromptKind, PromptState};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => close_prompt(app),
        (_, KeyCode::Enter) => {
            if let Some(prompt) = app.prompt.take() {
                app.mode = Mode::Navigate;
                submit(app, prompt.kind, prompt.buffer.trim());
            }
        }
        (_, KeyCode::Left) => {
            if let Some(pos) = prev_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = next_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => prompt.cursor = 0,
        (_, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            prompt.cursor = prompt.buffer.len();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            prompt.buffer.drain(..prompt.cursor);
            prompt.cursor = 0;
        }
        (_, KeyCode::Backspace) => {
            if let Some(pos) = prev_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.buffer.drain(pos..prompt.cursor);
                prompt.cursor = pos;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = next_grapheme_boundary(&prompt.buffer, prompt.cursor) {
                prompt.buffer.drain(prompt.cursor..end);
            }
        }
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            prompt.buffer.insert(prompt.cursor, c);
            prompt.cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn close_prompt(app: &mut App) {
    app.prompt = None;
    app.mode = Mode::Navigate;
}

fn submit(app: &mut App, kind: PromptKind, text: &str) {
    // An empty answer cancels, except where a value is required
    if text.is_empty() && !matches!(kind, PromptKind::NewPriority { .. }) {
        return;
    }
    let result = match kind {
        PromptKind::NewMessage => {
            app.open_prompt(PromptState::new(PromptKind::NewPriority {
                message: text.to_string(),
            }));
            Ok(())
        }
        PromptKind::NewPriority { message } => {
            match text.parse::<u8>().ok().and_then(Priority::new) {
                Some(priority) => app.add_todo(&message, priority),
                None => {
                    app.set_error("priority must be a number from 1 to 9");
                    app.open_prompt(PromptState::new(PromptKind::NewPriority { message }));
                    Ok(())
                }
            }
        }
        PromptKind::EditMessage { id } => app.edit_message(id, text),
        PromptKind::Search => {
            app.last_search = Some(text.to_string());
            app.search_next(true);
            Ok(())
        }
    };
    if let Err(e) = result {
        app.set_error(e);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::tui::app::{App, Mode, PromptKind};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::app_with_todos;

    fn key(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_asks_message_then_priority() {
        let (_tmp, mut app) = app_with_todos("[1] first\n[4] last\n");
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "middle");
        key(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.prompt.as_ref().map(|p| &p.kind),
            Some(PromptKind::NewPriority { .. })
        ));
        type_str(&mut app, "2");
        key(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.panel.highlighted, 2);
        assert_eq!(app.selected().unwrap().message, "middle");
    }

    #[test]
    fn bad_priority_asks_again() {
        let (_tmp, mut app) = app_with_todos("");
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "x");
        key(&mut app, KeyCode::Enter);
        type_str(&mut app, "0");
        key(&mut app, KeyCode::Enter);
        assert!(app.status_is_error);
        assert_eq!(app.mode, Mode::Prompt);
        assert!(app.store.is_empty());
    }

    #[test]
    fn empty_message_cancels() {
        let (_tmp, mut app) = app_with_todos("");
        key(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "   ");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.prompt.is_none());
    }

    #[test]
    fn escape_discards_edit() {
        let (_tmp, mut app) = app_with_todos("[1] keep\n");
        key(&mut app, KeyCode::Char('e'));
        type_str(&mut app, " changed");
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.selected().unwrap().message, "keep");
    }

    #[test]
    fn cursor_edits_on_grapheme_boundaries() {
        let (_tmp, mut app) = app_with_todos("[1] café\n");
        key(&mut app, KeyCode::Char('e'));
        key(&mut app, KeyCode::Backspace);
        key(&mut app, KeyCode::Left);
        type_str(&mut app, "X");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.selected().unwrap().message, "caXf");
    }

    #[test]
    fn search_prompt_jumps_to_match() {
        let (_tmp, mut app) = app_with_todos("[1] alpha\n[2] beta\n[3] gamma\n");
        key(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "GAM");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.panel.highlighted, 3);
        assert_eq!(app.last_search.as_deref(), Some("GAM"));
    }
}
