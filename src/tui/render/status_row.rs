use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_with_ellipsis};

const KEY_HINTS: &str = "a add  d del  c done  +/- prio  n note  / find  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Prompt => {
            let Some(prompt) = &app.prompt else {
                return;
            };
            let label = prompt.kind.label();
            let cursor_col = display_width(label)
                + byte_offset_to_display_col(&prompt.buffer, prompt.cursor);
            if cursor_col < width {
                frame.set_cursor_position(Position::new(area.x + cursor_col as u16, area.y));
            }
            Line::from(vec![
                Span::styled(label, Style::default().fg(app.theme.accent).bg(bg)),
                Span::styled(
                    prompt.buffer.clone(),
                    Style::default().fg(app.theme.title).bg(bg),
                ),
            ])
        }
        Mode::Confirm => {
            let question = app.confirm.as_ref().map_or("", |c| c.question());
            Line::from(Span::styled(
                question,
                Style::default().fg(app.theme.question).bg(bg),
            ))
        }
        Mode::Navigate => {
            if let Some(message) = &app.status_message {
                let fg = if app.status_is_error {
                    app.theme.error
                } else {
                    app.theme.success
                };
                Line::from(Span::styled(message.clone(), Style::default().fg(fg).bg(bg)))
            } else {
                navigate_line(app, width)
            }
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Selected todo on the left, key hints on the right when they fit
fn navigate_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.muted).bg(bg);
    let mut spans = Vec::new();

    let hints = if app.config.ui.show_key_hints { KEY_HINTS } else { "" };
    let hint_width = display_width(hints);

    if let Some(message) = &app.panel.last_saved_message {
        let room = width.saturating_sub(hint_width + 2);
        if room > 4 {
            let dirty = if app.dirty { "* " } else { "" };
            let text = format!("{}{}", dirty, truncate_with_ellipsis(message, room - 2));
            spans.push(Span::styled(text, Style::default().fg(app.theme.text).bg(bg)));
        }
    }

    if !hints.is_empty() {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hints, dim));
        }
    }
    Line::from(spans)
}
