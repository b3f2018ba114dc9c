pub mod config_io;
pub mod lock;
pub mod notes;
pub mod state;
pub mod todo_io;
pub mod watcher;
