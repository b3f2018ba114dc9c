use serde::Serialize;

use crate::model::TodoItem;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, PartialEq)]
pub struct TodoJson {
    pub position: usize,
    pub identity: i32,
    pub priority: u8,
    pub completed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn todo_to_json(position: usize, item: &TodoItem) -> TodoJson {
    TodoJson {
        position,
        identity: item.identity(),
        priority: item.priority.get(),
        completed: item.completed,
        message: item.message.clone(),
        note: item.note.as_ref().map(|n| n.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One `tick list` row: position, glyphs, message
pub fn format_todo_line(position: usize, item: &TodoItem, width: usize) -> String {
    format!(
        "{:>width$}. {}{} {}",
        position,
        item.glyph(),
        item.note_glyph(),
        item.message,
        width = width
    )
}
