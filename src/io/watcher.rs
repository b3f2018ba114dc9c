use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches the data directory for changes to the todo file made by other
/// programs, such as a text editor.
pub struct TodoWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl TodoWatcher {
    /// Start watching `todo_path`. The parent directory is watched so that
    /// atomic replace-by-rename is seen.
    pub fn start(todo_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target: PathBuf = todo_path.to_path_buf();
        let dir = todo_path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                if event.paths.iter().any(|p| p == &target) {
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(TodoWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events; true if the todo file changed since last poll
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}
