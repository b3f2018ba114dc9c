use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::lock::DataLock;
use crate::io::todo_io::{self, DataDir};
use crate::model::{NoteRef, StoreError, TodoId, TodoStore};

/// How long a write command waits for another tick process
const LOCK_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(
    command: Commands,
    json: bool,
    data_dir: &DataDir,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Read commands
        Commands::List(args) => cmd_list(args, json, data_dir),
        Commands::Note(args) => cmd_note(args, data_dir),

        // Write commands
        Commands::Add(args) => cmd_add(args, json, data_dir),
        Commands::Flag(args) => cmd_flag(args, json, data_dir),
        Commands::Rm(args) => cmd_rm(args, json, data_dir),
        Commands::Prio(args) => cmd_prio(args, json, data_dir),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the data directory, load, apply `f`, save.
fn with_store<T>(
    data_dir: &DataDir,
    f: impl FnOnce(&mut TodoStore) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    data_dir.ensure()?;
    let _lock = DataLock::acquire(data_dir.root(), LOCK_TIMEOUT)?;
    let mut store = todo_io::load_todos(data_dir)?;
    let result = f(&mut store)?;
    todo_io::save_todos(data_dir, &store)?;
    Ok(result)
}

/// Print the todo `id` as a list row or JSON object
fn print_todo(store: &TodoStore, id: TodoId, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let position = store.position_of(id)?;
    let item = store.item_at(position)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&todo_to_json(position, item))?
        );
    } else {
        println!("{}", format_todo_line(position, item, 1));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    let store = todo_io::load_todos(data_dir)?;
    let rows: Vec<_> = store
        .iter()
        .enumerate()
        .map(|(i, item)| (i + 1, item))
        .filter(|(_, item)| {
            if args.pending {
                !item.completed
            } else if args.completed {
                item.completed
            } else {
                true
            }
        })
        .collect();

    if json {
        let out: Vec<TodoJson> = rows
            .iter()
            .map(|(pos, item)| todo_to_json(*pos, item))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let width = store.len().to_string().len();
    for (pos, item) in rows {
        println!("{}", format_todo_line(pos, item, width));
    }
    Ok(())
}

fn cmd_note(args: PositionArgs, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    let store = todo_io::load_todos(data_dir)?;
    let item = store.item_at(args.position)?;
    let note = item.note.as_ref().ok_or(StoreError::NoNoteAttached)?;
    let text = data_dir.note_store().read(note)?;
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    with_store(data_dir, |store| {
        let note = match &args.note {
            Some(text) => data_dir.note_store().create(text)?,
            None => None,
        };
        let id = store.add(
            &args.message,
            i32::from(args.priority),
            note.as_ref().map(NoteRef::as_str),
        )?;
        log::info!("cli: added todo (priority {}): {}", args.priority, args.message);
        print_todo(store, id, json)
    })
}

fn cmd_flag(args: PositionArgs, json: bool, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    with_store(data_dir, |store| {
        let id = store.item_at(args.position)?.id;
        store.flag_completed(id)?;
        print_todo(store, id, json)
    })
}

fn cmd_rm(args: PositionArgs, json: bool, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    with_store(data_dir, |store| {
        let id = store.item_at(args.position)?.id;
        let item = store.delete(id)?;
        log::info!("cli: deleted todo: {}", item.message);
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&todo_to_json(args.position, &item))?
            );
        } else {
            println!("deleted: {}", item.message);
        }
        Ok(())
    })
}

fn cmd_prio(args: PrioArgs, json: bool, data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    with_store(data_dir, |store| {
        let id = store.item_at(args.position)?.id;
        let new_id = store.change_priority(id, args.delta)?;
        print_todo(store, new_id, json)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn data_dir(tmp: &TempDir, source: &str) -> DataDir {
        let dir = DataDir::new(tmp.path());
        dir.ensure().unwrap();
        std::fs::write(dir.todo_path(), source).unwrap();
        dir
    }

    fn on_disk(dir: &DataDir) -> String {
        std::fs::read_to_string(dir.todo_path()).unwrap()
    }

    #[test]
    fn add_with_note_writes_note_file() {
        let tmp = TempDir::new().unwrap();
        let dir = data_dir(&tmp, "[1] first\n");
        let args = AddArgs {
            message: "second".into(),
            priority: 2,
            note: Some("details".into()),
        };
        cmd_add(args, false, &dir).unwrap();

        let store = todo_io::load_todos(&dir).unwrap();
        let item = store.item_at(2).unwrap();
        let note = item.note.as_ref().unwrap();
        assert_eq!(dir.note_store().read(note).unwrap(), "details");
    }

    #[test]
    fn flag_and_prio_rewrite_file() {
        let tmp = TempDir::new().unwrap();
        let dir = data_dir(&tmp, "[1] a\n[2] b\n");
        cmd_flag(PositionArgs { position: 1 }, false, &dir).unwrap();
        assert_eq!(on_disk(&dir), "[-1] a\n[2] b\n");

        cmd_prio(PrioArgs { position: 1, delta: 5 }, false, &dir).unwrap();
        assert_eq!(on_disk(&dir), "[2] b\n[6] a\n");
    }

    #[test]
    fn rm_out_of_range_leaves_file_alone() {
        let tmp = TempDir::new().unwrap();
        let dir = data_dir(&tmp, "[1] a\n");
        let err = cmd_rm(PositionArgs { position: 4 }, false, &dir).unwrap_err();
        assert!(err.to_string().contains("no such todo"));
        assert_eq!(on_disk(&dir), "[1] a\n");
    }

    #[test]
    fn note_without_note_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let dir = data_dir(&tmp, "[1] a\n");
        let err = cmd_note(PositionArgs { position: 1 }, &dir).unwrap_err();
        assert_eq!(err.to_string(), "no note attached");
    }

    #[cfg(unix)]
    #[test]
    fn write_commands_respect_the_lock() {
        let tmp = TempDir::new().unwrap();
        let dir = data_dir(&tmp, "[1] a\n");
        let _held = DataLock::try_acquire(dir.root()).unwrap();
        assert!(cmd_flag(PositionArgs { position: 1 }, false, &dir).is_err());
        assert_eq!(on_disk(&dir), "[1] a\n");
    }
}
