use super::todo::{NoteRef, Priority, TodoId, TodoItem};

/// Error type for todo store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no such todo: {0}")]
    NotFound(String),
    #[error("no note attached")]
    NoNoteAttached,
    #[error("todo message cannot be empty")]
    EmptyMessage,
    #[error("todo message must fit on one line")]
    MultilineMessage,
    #[error("invalid todo identity: {0} (expected -9..=9, not 0)")]
    InvalidIdentity(i32),
}

/// Todos sorted ascending by priority. Items of equal priority keep
/// insertion order. Positions handed out by the store are 1-based.
#[derive(Debug, Default)]
pub struct TodoStore {
    items: Vec<TodoItem>,
    next_id: u64,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter()
    }

    /// Insert a new todo after every existing todo of the same priority.
    /// A note reference is attached only when `note` is non-empty.
    pub fn add(
        &mut self,
        message: &str,
        identity: i32,
        note: Option<&str>,
    ) -> Result<TodoId, StoreError> {
        check_message(message)?;
        let (priority, completed) = TodoItem::split_identity(identity)?;

        let id = TodoId(self.next_id);
        self.next_id += 1;

        let item = TodoItem {
            id,
            priority,
            completed,
            message: message.to_string(),
            note: note.filter(|n| !n.is_empty()).map(NoteRef::new),
        };
        let at = self.items.partition_point(|it| it.priority <= priority);
        self.items.insert(at, item);
        log::debug!("added todo {:?} at position {}", id, at + 1);
        Ok(id)
    }

    /// 1-based lookup
    pub fn item_at(&self, position: usize) -> Result<&TodoItem, StoreError> {
        position
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .ok_or_else(|| StoreError::NotFound(format!("position {}", position)))
    }

    /// 1-based position of the given todo
    pub fn position_of(&self, id: TodoId) -> Result<usize, StoreError> {
        self.index_of(id).map(|i| i + 1)
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|it| it.id == id)
    }

    /// Remove a todo. Its note reference goes with it.
    pub fn delete(&mut self, id: TodoId) -> Result<TodoItem, StoreError> {
        let idx = self.index_of(id)?;
        Ok(self.items.remove(idx))
    }

    /// Toggle completion. Ordering depends on priority alone, so the
    /// item stays where it is.
    pub fn flag_completed(&mut self, id: TodoId) -> Result<(), StoreError> {
        let item = self.get_mut(id)?;
        item.completed = !item.completed;
        Ok(())
    }

    /// Move a todo to `priority + delta` (clamped to 1..=9) by removing it
    /// and inserting it again. The re-added todo is always pending.
    pub fn change_priority(&mut self, id: TodoId, delta: i32) -> Result<TodoId, StoreError> {
        let idx = self.index_of(id)?;
        let old = self.items.remove(idx);
        let priority = Priority::clamped(i32::from(old.priority.get()).saturating_add(delta));
        let note = old.note.as_ref().map(NoteRef::as_str);
        let new_id = self.add(&old.message, i32::from(priority.get()), note)?;
        log::debug!(
            "priority of {:?} changed {} -> {} (now {:?})",
            id,
            old.priority,
            priority,
            new_id
        );
        Ok(new_id)
    }

    /// Release the note reference, handing it back to the caller
    pub fn detach_note(&mut self, id: TodoId) -> Result<NoteRef, StoreError> {
        self.get_mut(id)?.note.take().ok_or(StoreError::NoNoteAttached)
    }

    /// Replace (or clear) the note reference
    pub fn attach_note(&mut self, id: TodoId, note: Option<NoteRef>) -> Result<(), StoreError> {
        self.get_mut(id)?.note = note;
        Ok(())
    }

    pub fn set_message(&mut self, id: TodoId, message: &str) -> Result<(), StoreError> {
        check_message(message)?;
        self.get_mut(id)?.message = message.to_string();
        Ok(())
    }

    /// Every note reference held by a todo
    pub fn note_refs(&self) -> impl Iterator<Item = &NoteRef> {
        self.items.iter().filter_map(|it| it.note.as_ref())
    }

    /// Drop every todo (and with them, their notes)
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn index_of(&self, id: TodoId) -> Result<usize, StoreError> {
        self.items
            .iter()
            .position(|it| it.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{:?}", id)))
    }

    fn get_mut(&mut self, id: TodoId) -> Result<&mut TodoItem, StoreError> {
        self.items
            .iter_mut()
            .find(|it| it.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{:?}", id)))
    }
}

/// The todo file holds one todo per line
fn check_message(message: &str) -> Result<(), StoreError> {
    if message.is_empty() {
        Err(StoreError::EmptyMessage)
    } else if message.contains(['\n', '\r']) {
        Err(StoreError::MultilineMessage)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priorities(store: &TodoStore) -> Vec<i32> {
        store.iter().map(|it| it.identity()).collect()
    }

    fn messages(store: &TodoStore) -> Vec<&str> {
        store.iter().map(|it| it.message.as_str()).collect()
    }

    #[test]
    fn add_keeps_sorted_with_stable_ties() {
        let mut store = TodoStore::new();
        for (msg, prio) in [("a", 5), ("b", 2), ("c", 5), ("d", -2), ("e", 9), ("f", 1)] {
            store.add(msg, prio, None).unwrap();
        }
        assert_eq!(messages(&store), vec!["f", "b", "d", "a", "c", "e"]);
        let mags: Vec<i32> = store.iter().map(|it| it.identity().abs()).collect();
        assert!(mags.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn add_rejects_bad_input() {
        let mut store = TodoStore::new();
        assert!(matches!(
            store.add("", 1, None),
            Err(StoreError::EmptyMessage)
        ));
        assert!(matches!(
            store.add("x", 0, None),
            Err(StoreError::InvalidIdentity(0))
        ));
        assert!(matches!(
            store.add("x", -12, None),
            Err(StoreError::InvalidIdentity(-12))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_note_text_attaches_nothing() {
        let mut store = TodoStore::new();
        let a = store.add("a", 1, Some("")).unwrap();
        let b = store.add("b", 1, Some("abc123")).unwrap();
        assert!(store.get(a).unwrap().note.is_none());
        assert_eq!(store.get(b).unwrap().note, Some(NoteRef::new("abc123")));
    }

    #[test]
    fn item_at_bounds() {
        let mut store = TodoStore::new();
        store.add("only", 4, None).unwrap();
        assert_eq!(store.item_at(1).unwrap().message, "only");
        assert!(matches!(store.item_at(0), Err(StoreError::NotFound(_))));
        assert!(matches!(store.item_at(2), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn position_consistency_after_add_and_delete() {
        let mut store = TodoStore::new();
        let mut ids = Vec::new();
        for (i, prio) in [3, 1, 4, 1, 5, 9, 2, 6].iter().enumerate() {
            ids.push(store.add(&format!("t{}", i), *prio, None).unwrap());
        }
        store.delete(ids[2]).unwrap();
        store.delete(ids[6]).unwrap();
        store.add("late", 1, None).unwrap();

        for p in 1..=store.len() {
            let id = store.item_at(p).unwrap().id;
            assert_eq!(store.position_of(id).unwrap(), p);
        }
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = TodoStore::new();
        let id = store.add("x", 1, None).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.position_of(id), Err(StoreError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn flag_twice_restores_identity() {
        let mut store = TodoStore::new();
        let id = store.add("x", 6, None).unwrap();
        store.flag_completed(id).unwrap();
        assert_eq!(store.get(id).unwrap().identity(), -6);
        store.flag_completed(id).unwrap();
        assert_eq!(store.get(id).unwrap().identity(), 6);
    }

    #[test]
    fn change_priority_clamps_and_clears_completion() {
        let mut store = TodoStore::new();
        let id = store.add("x", -4, Some("n1")).unwrap();
        let id = store.change_priority(id, 1000).unwrap();
        let item = store.get(id).unwrap();
        assert_eq!(item.identity(), 9);
        assert_eq!(item.note, Some(NoteRef::new("n1")));

        let id = store.change_priority(id, i32::MIN).unwrap();
        assert_eq!(store.get(id).unwrap().identity(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn change_priority_on_missing_item_leaves_store_untouched() {
        let mut store = TodoStore::new();
        let id = store.add("x", 2, None).unwrap();
        store.delete(id).unwrap();
        store.add("y", 2, None).unwrap();
        assert!(store.change_priority(id, 1).is_err());
        assert_eq!(messages(&store), vec!["y"]);
    }

    #[test]
    fn scenario_flag_then_reprioritize() {
        let mut store = TodoStore::new();
        let two = store.add("two", 2, None).unwrap();
        let one_a = store.add("one-a", 1, None).unwrap();
        let one_b = store.add("one-b", 1, None).unwrap();
        assert_eq!(messages(&store), vec!["one-a", "one-b", "two"]);

        store.flag_completed(one_a).unwrap();
        assert_eq!(priorities(&store), vec![-1, 1, 2]);

        let third = store.item_at(3).unwrap().id;
        assert_eq!(third, two);
        let moved = store.change_priority(third, -1).unwrap();
        assert_eq!(priorities(&store), vec![-1, 1, 1]);
        assert_eq!(store.position_of(moved).unwrap(), 3);
        assert_eq!(store.position_of(one_b).unwrap(), 2);
    }

    #[test]
    fn detach_note() {
        let mut store = TodoStore::new();
        let id = store.add("x", 1, Some("abc")).unwrap();
        assert_eq!(store.detach_note(id).unwrap(), NoteRef::new("abc"));
        assert!(matches!(
            store.detach_note(id),
            Err(StoreError::NoNoteAttached)
        ));
    }

    #[test]
    fn attach_and_collect_note_refs() {
        let mut store = TodoStore::new();
        let a = store.add("a", 1, None).unwrap();
        store.add("b", 2, Some("bbb")).unwrap();
        store.attach_note(a, Some(NoteRef::new("aaa"))).unwrap();
        let refs: Vec<&str> = store.note_refs().map(NoteRef::as_str).collect();
        assert_eq!(refs, vec!["aaa", "bbb"]);
    }

    #[test]
    fn set_message() {
        let mut store = TodoStore::new();
        let id = store.add("old", 1, None).unwrap();
        store.set_message(id, "new").unwrap();
        assert_eq!(store.get(id).unwrap().message, "new");
        assert!(matches!(
            store.set_message(id, ""),
            Err(StoreError::EmptyMessage)
        ));
        assert!(matches!(
            store.set_message(id, "two\r\nlines"),
            Err(StoreError::MultilineMessage)
        ));
        assert_eq!(store.get(id).unwrap().message, "new");
    }

    #[test]
    fn line_breaks_cannot_sneak_into_the_file() {
        let mut store = TodoStore::new();
        store.add("keep", 1, None).unwrap();
        for message in ["a\n[9] injected", "\n", "carriage\rreturn"] {
            assert!(matches!(
                store.add(message, 2, None),
                Err(StoreError::MultilineMessage)
            ));
        }
        assert_eq!(messages(&store), vec!["keep"]);
        assert_eq!(crate::parse::serialize_todos(&store), "[1] keep\n");
    }

    #[test]
    fn clear_drops_everything() {
        let mut store = TodoStore::new();
        store.add("a", 1, Some("n")).unwrap();
        store.add("b", 2, None).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.note_refs().count(), 0);
    }
}
