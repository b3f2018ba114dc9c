use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Some(action) = app.confirm.clone() else {
        app.mode = Mode::Navigate;
        return;
    };

    let result = match (action, key.code) {
        (_, KeyCode::Esc) => Ok(()),
        (ConfirmAction::DeleteTodo { id }, KeyCode::Char('y')) => app.delete_todo(id),
        (ConfirmAction::DeleteTodo { .. }, KeyCode::Char('n')) => Ok(()),
        (ConfirmAction::DeleteTodoOrNote { id }, KeyCode::Char('t')) => app.delete_todo(id),
        (ConfirmAction::DeleteTodoOrNote { id }, KeyCode::Char('n')) => app.detach_note(id),
        (ConfirmAction::Reload, KeyCode::Char('y')) => app.reload(),
        (ConfirmAction::Reload, KeyCode::Char('n')) => Ok(()),
        (ConfirmAction::SaveBeforeQuit, KeyCode::Char('y')) => app.save().map(|()| {
            app.should_quit = true;
        }),
        (ConfirmAction::SaveBeforeQuit, KeyCode::Char('n')) => {
            app.should_quit = true;
            Ok(())
        }
        // Anything else keeps the question open
        _ => return,
    };

    app.confirm = None;
    app.mode = Mode::Navigate;
    if let Err(e) = result {
        app.set_error(e);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::tui::app::{App, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::app_with_todos;

    fn key(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn yes_deletes() {
        let (_tmp, mut app) = app_with_todos("[1] a\n[2] b\n");
        app.config.general.confirm_delete = true;
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected().unwrap().message, "b");
    }

    #[test]
    fn other_keys_keep_question_open() {
        let (_tmp, mut app) = app_with_todos("[1] a\n");
        app.config.general.confirm_delete = true;
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, Mode::Confirm);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn note_choice_detaches_only_the_note() {
        let (_tmp, mut app) = app_with_todos("[1]>abc a\n");
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 1);
        assert!(app.selected().unwrap().note.is_none());
    }

    #[test]
    fn todo_choice_deletes_todo_with_note() {
        let (_tmp, mut app) = app_with_todos("[1]>abc a\n");
        key(&mut app, KeyCode::Char('d'));
        key(&mut app, KeyCode::Char('t'));
        assert!(app.store.is_empty());
        assert_eq!(app.panel.highlighted, 0);
    }

    #[test]
    fn quit_without_saving() {
        let (tmp, mut app) = app_with_todos("[1] a\n");
        app.config.general.autosave = false;
        key(&mut app, KeyCode::Char('c'));
        key(&mut app, KeyCode::Char('q'));
        key(&mut app, KeyCode::Char('n'));
        assert!(app.should_quit);
        let on_disk = std::fs::read_to_string(tmp.path().join("todo")).unwrap();
        assert_eq!(on_disk, "[1] a\n");
    }

    #[test]
    fn quit_with_saving() {
        let (tmp, mut app) = app_with_todos("[1] a\n");
        app.config.general.autosave = false;
        key(&mut app, KeyCode::Char('c'));
        key(&mut app, KeyCode::Char('q'));
        key(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
        let on_disk = std::fs::read_to_string(tmp.path().join("todo")).unwrap();
        assert_eq!(on_disk, "[-1] a\n");
    }
}
