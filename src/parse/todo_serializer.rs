use std::io::{self, Write};

use crate::model::store::TodoStore;
use crate::model::todo::TodoItem;

/// Write one todo as a single line:
/// `[<identity>]><note> <message>` or `[<identity>] <message>`.
pub fn write_line<W: Write>(item: &TodoItem, sink: &mut W) -> io::Result<()> {
    match &item.note {
        Some(note) => writeln!(sink, "[{}]>{} {}", item.identity(), note, item.message),
        None => writeln!(sink, "[{}] {}", item.identity(), item.message),
    }
}

/// Serialize the whole store in its sorted order
pub fn serialize_todos(store: &TodoStore) -> String {
    let mut out = Vec::new();
    for item in store.iter() {
        // Writing into a Vec cannot fail
        let _ = write_line(item, &mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::todo::NoteRef;
    use crate::parse::todo_parser::load_store;
    use pretty_assertions::assert_eq;

    fn line_of(item: &TodoItem) -> String {
        let mut out = Vec::new();
        write_line(item, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn write_line_shapes() {
        let mut store = TodoStore::new();
        let id = store.add("Buy milk", 3, None).unwrap();
        assert_eq!(line_of(store.get(id).unwrap()), "[3] Buy milk\n");

        store
            .attach_note(id, Some(NoteRef::new("notes/abc123")))
            .unwrap();
        assert_eq!(
            line_of(store.get(id).unwrap()),
            "[3]>notes/abc123 Buy milk\n"
        );
    }

    #[test]
    fn completed_items_write_negative_identity() {
        let mut store = TodoStore::new();
        let id = store.add("Done thing", 2, None).unwrap();
        store.flag_completed(id).unwrap();
        assert_eq!(line_of(store.get(id).unwrap()), "[-2] Done thing\n");
    }

    #[test]
    fn serialize_follows_store_order() {
        let (store, _) = load_store("[5] five\n[1]>n one\n[-3] three\n");
        assert_eq!(serialize_todos(&store), "[1]>n one\n[-3] three\n[5] five\n");
    }

    #[test]
    fn serialize_empty_store() {
        assert_eq!(serialize_todos(&TodoStore::new()), "");
    }
}
