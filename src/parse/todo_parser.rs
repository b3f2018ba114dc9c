use crate::model::store::TodoStore;
use crate::model::todo::TodoItem;

/// One line of the todo file, decoded but not yet placed in a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTodo {
    pub identity: i32,
    pub note: Option<String>,
    pub message: String,
}

/// Parse a todo file.
///
/// Each non-blank line is `[<identity>] <message>` or
/// `[<identity>]><note> <message>`. Lines that don't fit that shape, or
/// whose identity or message is invalid, are returned as dropped lines.
pub fn parse_todos(source: &str) -> (Vec<ParsedTodo>, Vec<String>) {
    let mut todos = Vec::new();
    let mut dropped = Vec::new();

    for line in source.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(todo) => todos.push(todo),
            None => dropped.push(line.to_string()),
        }
    }

    (todos, dropped)
}

/// Parse a todo file straight into a store. The store re-sorts, so a
/// hand-edited file in any order loads correctly.
pub fn load_store(source: &str) -> (TodoStore, Vec<String>) {
    let (todos, mut dropped) = parse_todos(source);
    let mut store = TodoStore::new();
    for todo in todos {
        if store
            .add(&todo.message, todo.identity, todo.note.as_deref())
            .is_err()
        {
            dropped.push(todo.message);
        }
    }
    (store, dropped)
}

fn parse_line(line: &str) -> Option<ParsedTodo> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let identity: i32 = rest[..close].parse().ok()?;
    TodoItem::split_identity(identity).ok()?;
    let rest = &rest[close + 1..];

    let (note, message) = match rest.strip_prefix('>') {
        Some(with_note) => {
            let (note, message) = with_note.split_once(' ')?;
            if note.is_empty() {
                return None;
            }
            (Some(note.to_string()), message)
        }
        None => (None, rest.strip_prefix(' ')?),
    };

    if message.is_empty() {
        return None;
    }

    Some(ParsedTodo {
        identity,
        note,
        message: message.to_string(),
    })
}
