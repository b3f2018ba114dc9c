pub mod note_preview;
pub mod status_row;
pub mod todo_panel;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Focus};

/// Below this width the note preview is hidden
const MIN_WIDTH_FOR_PREVIEW: u16 = 60;

/// Main render function: todo panel, note preview, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: panels | status row (1 row)
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let todo_area = if area.width >= MIN_WIDTH_FOR_PREVIEW {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        note_preview::render_note_preview(frame, app, cols[1]);
        cols[0]
    } else {
        rows[0]
    };

    let active = app.focus == Focus::Todos;
    todo_panel::render_todo_panel(
        frame,
        todo_area,
        &app.store,
        &mut app.panel,
        &app.theme,
        active,
    );

    status_row::render_status_row(frame, app, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{app_with_todos, render_app, render_to_string};

    #[test]
    fn full_screen_has_both_panels() {
        let (_tmp, mut app) = app_with_todos("[1] Buy milk\n[2] Call mom\n");
        let output = render_app(&mut app);
        assert!(output.contains("TODO"));
        assert!(output.contains("NOTE"));
        assert!(output.contains("1. Buy milk"));
        assert_eq!(app.panel.viewport_capacity, 19);
        assert_eq!(app.panel.last_saved_message.as_deref(), Some("Buy milk"));
    }

    #[test]
    fn narrow_screen_hides_preview() {
        let (_tmp, mut app) = app_with_todos("[1] Buy milk\n");
        let output = render_to_string(40, 10, |frame, _| super::render(frame, &mut app));
        assert!(output.contains("TODO"));
        assert!(!output.contains("NOTE"));
    }
}
