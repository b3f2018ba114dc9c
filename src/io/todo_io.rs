use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::notes::NoteStore;
use crate::model::store::TodoStore;
use crate::parse::{load_store, serialize_todos};

/// Environment variable that overrides the default data directory
pub const DATA_DIR_ENV: &str = "TICKLIST_DIR";

/// Error type for todo file I/O
#[derive(Debug, thiserror::Error)]
pub enum TodoIoError {
    #[error("could not determine a data directory; pass --data-dir or set {DATA_DIR_ENV}")]
    NoDataDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} has lines tick cannot read; fix them by hand first:{}", list_lines(.lines))]
    Malformed { path: PathBuf, lines: Vec<String> },
}

fn list_lines(lines: &[String]) -> String {
    lines.iter().map(|l| format!("\n  {:?}", l)).collect()
}

/// The directory holding the todo file, notes, lock, and logs
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataDir { root: root.into() }
    }

    /// `--data-dir` → `$TICKLIST_DIR` → platform data dir
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, TodoIoError> {
        if let Some(dir) = explicit {
            return Ok(DataDir::new(dir));
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(DataDir::new(PathBuf::from(dir)));
        }
        dirs::data_dir()
            .map(|d| DataDir::new(d.join("ticklist")))
            .ok_or(TodoIoError::NoDataDir)
    }

    /// Create the directory and its notes/ subdirectory if missing
    pub fn ensure(&self) -> Result<(), TodoIoError> {
        let notes = self.notes_dir();
        fs::create_dir_all(&notes).map_err(|e| TodoIoError::WriteError {
            path: notes,
            source: e,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn todo_path(&self) -> PathBuf {
        self.root.join("todo")
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(".state.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("ticklist.log")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn note_store(&self) -> NoteStore {
        NoteStore::new(self.notes_dir())
    }
}

/// Load the todo file. A missing file is an empty store. A file with
/// lines that do not parse is refused, since saving would lose them.
pub fn load_todos(dir: &DataDir) -> Result<TodoStore, TodoIoError> {
    load_todos_with_source(dir).map(|(store, _)| store)
}

/// Like [`load_todos`], also returning the raw file text (`None` when the
/// file does not exist).
pub fn load_todos_with_source(dir: &DataDir) -> Result<(TodoStore, Option<String>), TodoIoError> {
    let path = dir.todo_path();
    let Some(source) = read_todo_file(&path)? else {
        log::info!("no todo file at {}, starting empty", path.display());
        return Ok((TodoStore::new(), None));
    };
    let store = parse_strict(&path, &source)?;
    log::info!("loaded {} todos from {}", store.len(), path.display());
    Ok((store, Some(source)))
}

/// Write the todo file atomically and collect notes no todo references.
/// Returns the text written, so callers can recognise their own writes.
///
/// A todo file that has picked up unreadable lines since it was loaded
/// (someone edited it by hand) is left alone.
pub fn save_todos(dir: &DataDir, store: &TodoStore) -> Result<String, TodoIoError> {
    dir.ensure()?;
    let path = dir.todo_path();
    if let Some(on_disk) = read_todo_file(&path)? {
        parse_strict(&path, &on_disk)?;
    }
    let content = serialize_todos(store);
    atomic_write(&path, content.as_bytes()).map_err(|e| TodoIoError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    log::info!("saved {} todos to {}", store.len(), path.display());

    match dir.note_store().gc(store.note_refs()) {
        Ok(0) => {}
        Ok(n) => log::info!("removed {} unreferenced notes", n),
        Err(e) => log::warn!("note cleanup failed: {}", e),
    }
    Ok(content)
}

fn read_todo_file(path: &Path) -> Result<Option<String>, TodoIoError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(Some(source)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TodoIoError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn parse_strict(path: &Path, source: &str) -> Result<TodoStore, TodoIoError> {
    let (store, dropped) = load_store(source);
    if dropped.is_empty() {
        return Ok(store);
    }
    for line in &dropped {
        log::warn!("{}: malformed line: {:?}", path.display(), line);
    }
    Err(TodoIoError::Malformed {
        path: path.to_path_buf(),
        lines: dropped,
    })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
