use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::io::notes::NoteError;
use crate::tui::app::{App, Focus};

/// Render the note attached to the highlighted todo
pub fn render_note_preview(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.focus == Focus::Preview;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border(active))
        .title(Span::styled(
            " NOTE ",
            Style::default().fg(app.theme.title),
        ))
        .style(Style::default().bg(app.theme.background));

    let dim = app.theme.fg(app.theme.muted);
    let lines: Vec<Line> = match app.selected().and_then(|t| t.note.as_ref()) {
        None => vec![Line::from(Span::styled("(no note)", dim))],
        Some(note) => match app.notes.read(note) {
            Ok(text) => {
                let style = app.theme.fg(app.theme.text);
                text.lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), style)))
                    .collect()
            }
            Err(NoteError::Missing(_)) => vec![Line::from(Span::styled(
                format!("(note file {} is missing)", note),
                app.theme.fg(app.theme.error),
            ))],
            Err(e) => vec![Line::from(Span::styled(
                e.to_string(),
                app.theme.fg(app.theme.error),
            ))],
        },
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));
    frame.render_widget(paragraph, area);
}
