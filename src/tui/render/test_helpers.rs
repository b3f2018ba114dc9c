use std::fs;

use ratatui::{Frame, Terminal};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::todo_io::{DataDir, load_todos_with_source};
use crate::model::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Draw with `draw` on a `w`x`h` test terminal and return the screen as
/// text: styles dropped, trailing spaces and trailing blank rows trimmed.
pub fn render_to_string(w: u16, h: u16, draw: impl FnOnce(&mut Frame, Rect)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            draw(frame, area);
        })
        .unwrap();

    let screen = terminal.backend().buffer();
    let mut rows: Vec<String> = (0..screen.area.height)
        .map(|y| {
            let row: String = (0..screen.area.width)
                .map(|x| screen[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}

/// Build an App over a temp data directory whose todo file holds `source`.
/// Keep the `TempDir` alive for as long as the App is used.
pub fn app_with_todos(source: &str) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let data_dir = DataDir::new(tmp.path());
    data_dir.ensure().unwrap();
    fs::write(data_dir.todo_path(), source).unwrap();

    let (store, content) = load_todos_with_source(&data_dir).unwrap();
    let mut app = App::new(store, data_dir, Config::default());
    app.set_disk_content(content);
    (tmp, app)
}

/// Render the whole App at the default test terminal size.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| crate::tui::render::render(frame, app))
}
