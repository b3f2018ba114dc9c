use std::fmt;

use serde::{Deserialize, Serialize};

use super::store::StoreError;

/// Todo priority, 1 (highest) through 9 (lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(9);

    /// Returns `None` unless `n` is in `1..=9`
    pub fn new(n: u8) -> Option<Priority> {
        (Self::HIGHEST.0..=Self::LOWEST.0)
            .contains(&n)
            .then_some(Priority(n))
    }

    /// Clamp an arbitrary value into `1..=9`
    pub fn clamped(n: i32) -> Priority {
        let (lo, hi) = (i32::from(Self::HIGHEST.0), i32::from(Self::LOWEST.0));
        Priority(n.clamp(lo, hi) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Priority::new(n).ok_or_else(|| format!("priority out of range: {}", n))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned handle for a todo. Stable for the item's lifetime;
/// a priority change produces a new item and therefore a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(pub(crate) u64);

/// Opaque reference to a note resource (a file name in the notes directory)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteRef(String);

impl NoteRef {
    pub fn new(reference: impl Into<String>) -> Self {
        NoteRef(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub priority: Priority,
    pub completed: bool,
    /// Never empty
    pub message: String,
    pub note: Option<NoteRef>,
}

impl TodoItem {
    /// Signed on-disk encoding: `+priority` pending, `-priority` completed
    pub fn identity(&self) -> i32 {
        let p = i32::from(self.priority.get());
        if self.completed { -p } else { p }
    }

    /// Decode a signed identity into its priority and completion flag
    pub fn split_identity(identity: i32) -> Result<(Priority, bool), StoreError> {
        let magnitude = u8::try_from(identity.unsigned_abs())
            .ok()
            .and_then(Priority::new)
            .ok_or(StoreError::InvalidIdentity(identity))?;
        Ok((magnitude, identity < 0))
    }

    /// Priority digit for pending items, `X` otherwise
    pub fn glyph(&self) -> char {
        let identity = self.identity();
        if identity > 0 {
            char::from_digit(identity as u32, 10).unwrap_or('X')
        } else {
            'X'
        }
    }

    pub fn note_glyph(&self) -> char {
        if self.note.is_some() { '>' } else { '.' }
    }
}
