use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::model::TodoStore;
use crate::tui::panel::PanelState;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_with_ellipsis};

/// Rows above the first item: top border, title, separator
pub const HEADER_HEIGHT: u16 = 3;

/// Cells reserved around a message: borders, glyphs and scrollbar
const MESSAGE_MARGIN: u16 = 8;

const TITLE: &str = "TODO";

/// Scrollbar thumb placement in rows relative to the panel's top edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarGeometry {
    pub top: u16,
    pub length: u16,
}

/// Where the thumb goes, or `None` when everything fits.
///
/// The thumb is `capacity * (capacity + 1) / count` rows long and starts
/// `capacity * first_visible / count` rows below the header. If it would
/// run past `bottom` it is shortened, never moved up.
pub fn scrollbar_geometry(
    count: usize,
    capacity: usize,
    first_visible: usize,
    header: u16,
    bottom: u16,
) -> Option<ScrollbarGeometry> {
    if count <= capacity {
        return None;
    }
    let length = (capacity * (capacity + 1) / count) as u16;
    let top = (capacity * first_visible / count) as u16 + header;
    let length = if top + length > bottom {
        bottom.saturating_sub(top)
    } else {
        length
    };
    Some(ScrollbarGeometry { top, length })
}

/// Paint the bordered todo panel into `area`.
///
/// Records the viewport capacity in `panel`, and when `active` also the
/// message of the highlighted todo.
pub fn render_todo_panel(
    frame: &mut Frame,
    area: Rect,
    store: &TodoStore,
    panel: &mut PanelState,
    theme: &Theme,
    active: bool,
) {
    let border_style = theme.border(active);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(theme.background));
    frame.render_widget(block, area);

    let capacity = area.height.saturating_sub(HEADER_HEIGHT + 1);
    panel.viewport_capacity = capacity as usize;
    if active {
        panel.last_saved_message = store
            .item_at(panel.highlighted)
            .ok()
            .map(|item| item.message.clone());
    }
    if area.width < 4 || capacity == 0 {
        return;
    }

    let buf = frame.buffer_mut();
    let inner_width = area.width - 2;

    // Title and separator
    let title_x = area.x + 1 + inner_width.saturating_sub(display_width(TITLE) as u16) / 2;
    buf.set_stringn(
        title_x,
        area.y + 1,
        TITLE,
        inner_width as usize,
        theme.fg(theme.title),
    );
    let separator = format!("├{}┤", "─".repeat(inner_width as usize));
    buf.set_string(area.x, area.y + 2, separator, border_style);

    // Items
    let budget = area.width.saturating_sub(MESSAGE_MARGIN) as usize;
    let row_width = area.width.saturating_sub(3) as usize;
    for (i, item) in store.iter().enumerate() {
        let position = i + 1;
        let is_current = active && position == panel.highlighted;
        let visible_row = position as isize - panel.first_visible as isize;
        if visible_row < 0 || visible_row >= capacity as isize {
            continue;
        }
        let style = if is_current {
            theme.selected()
        } else {
            theme.todo(item.completed)
        };
        let text = format!(
            "{}{} {}",
            item.glyph(),
            item.note_glyph(),
            truncate_with_ellipsis(&item.message, budget)
        );
        let y = area.y + HEADER_HEIGHT + visible_row as u16;
        buf.set_stringn(area.x + 1, y, text, row_width, style);
    }

    // Scrollbar
    let bottom = area.height - 1;
    if let Some(thumb) = scrollbar_geometry(
        store.len(),
        capacity as usize,
        panel.first_visible,
        HEADER_HEIGHT,
        bottom,
    ) {
        let x = area.x + area.width - 2;
        let track_style = theme.fg(theme.muted);
        let thumb_style = if active {
            theme.fg(theme.accent)
        } else {
            track_style
        };
        for row in HEADER_HEIGHT..bottom {
            let on_thumb = row >= thumb.top && row < thumb.top + thumb.length;
            let (symbol, style) = if on_thumb {
                ("┃", thumb_style)
            } else {
                ("│", track_style)
            };
            buf.set_string(x, area.y + row, symbol, style);
        }
    }
}
