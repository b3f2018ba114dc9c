use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::StoreError;
use crate::tui::app::{
    App, AppError, ConfirmAction, ExternalCommand, Focus, PromptKind, PromptState,
};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;
    app.status_is_error = false;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('f') => app.page(1),
            KeyCode::Char('b') => app.page(-1),
            KeyCode::Char('c') => request_quit(app),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('q') => request_quit(app),
        KeyCode::Char('s') => match app.save() {
            Ok(()) => app.set_status("saved"),
            Err(e) => app.set_error(e),
        },
        KeyCode::Char('R') => {
            if app.dirty {
                app.ask(ConfirmAction::Reload);
            } else if let Err(e) = app.reload() {
                app.set_error(e);
            }
        }
        _ => match app.focus {
            Focus::Todos => handle_todo_key(app, key),
            Focus::Preview => handle_preview_key(app, key),
        },
    }
}

fn handle_preview_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.preview_scroll = app.preview_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.preview_scroll = app.preview_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.preview_scroll = 0,
        KeyCode::Esc => app.focus = Focus::Todos,
        _ => handle_todo_key(app, key),
    }
}

fn handle_todo_key(app: &mut App, key: KeyEvent) {
    let result = match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_highlight(1);
            Ok(())
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_highlight(-1);
            Ok(())
        }
        KeyCode::PageDown => {
            app.page(1);
            Ok(())
        }
        KeyCode::PageUp => {
            app.page(-1);
            Ok(())
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.go_first();
            Ok(())
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.go_last();
            Ok(())
        }
        KeyCode::Char('a') => {
            app.open_prompt(PromptState::new(PromptKind::NewMessage));
            Ok(())
        }
        KeyCode::Char('e') => begin_edit(app),
        KeyCode::Char('d') => request_delete(app),
        KeyCode::Char('c') | KeyCode::Char(' ') => {
            app.selected_id().and_then(|id| app.toggle_completed(id))
        }
        KeyCode::Char('+') => app.selected_id().and_then(|id| app.change_priority(id, -1)),
        KeyCode::Char('-') => app.selected_id().and_then(|id| app.change_priority(id, 1)),
        KeyCode::Char('n') => app.selected_id().map(|id| {
            app.pending_external = Some(ExternalCommand::EditNote(id));
        }),
        KeyCode::Char('>') => begin_view(app),
        KeyCode::Char('N') => app.selected_id().and_then(|id| app.detach_note(id)),
        KeyCode::Char('/') => {
            app.open_prompt(PromptState::new(PromptKind::Search));
            Ok(())
        }
        KeyCode::Char('*') => {
            app.search_next(true);
            Ok(())
        }
        KeyCode::Char('#') => {
            app.search_next(false);
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(e) = result {
        app.set_error(e);
    }
}

fn begin_edit(app: &mut App) -> Result<(), AppError> {
    let item = app.selected().ok_or(AppError::NothingSelected)?;
    let prompt = PromptState::with_text(
        PromptKind::EditMessage { id: item.id },
        item.message.clone(),
    );
    app.open_prompt(prompt);
    Ok(())
}

fn begin_view(app: &mut App) -> Result<(), AppError> {
    let item = app.selected().ok_or(AppError::NothingSelected)?;
    if item.note.is_none() {
        return Err(StoreError::NoNoteAttached.into());
    }
    app.pending_external = Some(ExternalCommand::ViewNote(item.id));
    Ok(())
}

fn request_delete(app: &mut App) -> Result<(), AppError> {
    let item = app.selected().ok_or(AppError::NothingSelected)?;
    let id = item.id;
    if item.note.is_some() {
        app.ask(ConfirmAction::DeleteTodoOrNote { id });
        Ok(())
    } else if app.config.general.confirm_delete {
        app.ask(ConfirmAction::DeleteTodo { id });
        Ok(())
    } else {
        app.delete_todo(id)
    }
}

fn request_quit(app: &mut App) {
    if app.dirty && !app.config.general.autosave {
        app.ask(ConfirmAction::SaveBeforeQuit);
    } else {
        app.should_quit = true;
    }
}
