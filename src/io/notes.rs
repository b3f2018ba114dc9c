use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::model::todo::NoteRef;

/// Error type for note operations
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("note {0} not found")]
    Missing(NoteRef),
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },
    #[error("note io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Content-addressed note files: each note lives in `dir/<blake3 hex>`.
#[derive(Debug, Clone)]
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        NoteStore { dir: dir.into() }
    }

    pub fn path(&self, note: &NoteRef) -> PathBuf {
        self.dir.join(note.as_str())
    }

    /// Store `text` as a note. Blank text creates nothing.
    pub fn create(&self, text: &str) -> Result<Option<NoteRef>, NoteError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)?;
        let name = blake3::hash(text.as_bytes()).to_hex().to_string();
        let path = self.dir.join(&name);
        if !path.exists() {
            crate::io::todo_io::atomic_write(&path, text.as_bytes())?;
        }
        Ok(Some(NoteRef::new(name)))
    }

    pub fn read(&self, note: &NoteRef) -> Result<String, NoteError> {
        let path = self.path(note);
        if !path.exists() {
            return Err(NoteError::Missing(note.clone()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Open the note (or an empty buffer) in `editor` and store the result.
    /// Returns `None` when the edited text is blank, which detaches the note.
    pub fn edit(&self, current: Option<&NoteRef>, editor: &str) -> Result<Option<NoteRef>, NoteError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("ticklist-note-")
            .suffix(".txt")
            .tempfile()?;
        if let Some(note) = current {
            // A dangling reference edits as an empty note
            if let Ok(text) = self.read(note) {
                tmp.write_all(text.as_bytes())?;
                tmp.flush()?;
            }
        }

        run_with_file(editor, tmp.path())?;

        let edited = fs::read_to_string(tmp.path())?;
        let note = self.create(&edited)?;
        log::debug!("note edited: {:?} -> {:?}", current, note);
        Ok(note)
    }

    /// Show the note in `pager`
    pub fn view(&self, note: &NoteRef, pager: &str) -> Result<(), NoteError> {
        let path = self.path(note);
        if !path.exists() {
            return Err(NoteError::Missing(note.clone()));
        }
        run_with_file(pager, &path)
    }

    /// Remove note files that no todo references. Only files named like
    /// note hashes are touched. Returns how many were removed.
    pub fn gc<'a>(&self, referenced: impl Iterator<Item = &'a NoteRef>) -> Result<usize, NoteError> {
        if !self.dir.is_dir() {
            return Ok(0);
        }
        let keep: HashSet<&str> = referenced.map(NoteRef::as_str).collect();
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if is_note_name(name) && !keep.contains(name) && entry.path().is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn is_note_name(name: &str) -> bool {
    name.len() == 64 && name.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Run `command <path>` through the shell so commands with arguments
/// (`code --wait`, `less -R`) work.
fn run_with_file(command: &str, path: &Path) -> Result<(), NoteError> {
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$1\"", command))
        .arg("sh")
        .arg(path)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(NoteError::CommandFailed {
            command: command.to_string(),
            status,
        })
    }
}
