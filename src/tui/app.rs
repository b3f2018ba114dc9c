use std::fs;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::lock::DataLock;
use crate::io::notes::{NoteError, NoteStore};
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::todo_io::{self, DataDir, TodoIoError};
use crate::io::watcher::TodoWatcher;
use crate::model::{Config, NoteRef, Priority, StoreError, TodoId, TodoItem, TodoStore};

use super::input;
use super::panel::PanelState;
use super::render;
use super::theme::Theme;

/// Error raised by a TUI command. The command is abandoned and the
/// message shown in the status row.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Io(#[from] TodoIoError),
    #[error("no todo selected")]
    NothingSelected,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the status row prompt
    Prompt,
    /// Waiting for an answer to a confirmation question
    Confirm,
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Todos,
    Preview,
}

/// What the status row prompt is collecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewMessage,
    NewPriority { message: String },
    EditMessage { id: TodoId },
    Search,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::NewMessage => "New todo: ",
            PromptKind::NewPriority { .. } => "Priority [1 (highest) - 9 (lowest)]: ",
            PromptKind::EditMessage { .. } => "Edit todo: ",
            PromptKind::Search => "/",
        }
    }
}

/// Prompt text being edited. `cursor` is a byte offset on a grapheme boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub kind: PromptKind,
    pub buffer: String,
    pub cursor: usize,
}

impl PromptState {
    pub fn new(kind: PromptKind) -> Self {
        Self::with_text(kind, String::new())
    }

    pub fn with_text(kind: PromptKind, buffer: String) -> Self {
        let cursor = buffer.len();
        PromptState {
            kind,
            buffer,
            cursor,
        }
    }
}

/// A pending yes/no (or todo/note) question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTodo { id: TodoId },
    /// The todo has a note: delete the whole todo or just the note
    DeleteTodoOrNote { id: TodoId },
    /// Reload from disk, discarding unsaved changes
    Reload,
    SaveBeforeQuit,
}

impl ConfirmAction {
    pub fn question(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteTodo { .. } => "Delete this todo? (y/n)",
            ConfirmAction::DeleteTodoOrNote { .. } => {
                "This todo has a note. Delete (t)odo or just its (n)ote? (Esc cancels)"
            }
            ConfirmAction::Reload => "Discard unsaved changes and reload? (y/n)",
            ConfirmAction::SaveBeforeQuit => "Save changes before quitting? (y/n, Esc cancels)",
        }
    }
}

/// Work that needs the real terminal (an editor or pager). The event loop
/// suspends the TUI around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalCommand {
    EditNote(TodoId),
    ViewNote(TodoId),
}

/// Main application state
pub struct App {
    pub store: TodoStore,
    pub panel: PanelState,
    pub data_dir: DataDir,
    pub notes: NoteStore,
    pub config: Config,
    pub theme: Theme,
    pub mode: Mode,
    pub focus: Focus,
    pub prompt: Option<PromptState>,
    pub confirm: Option<ConfirmAction>,
    pub pending_external: Option<ExternalCommand>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Changes not yet written to disk
    pub dirty: bool,
    pub should_quit: bool,
    pub last_search: Option<String>,
    pub preview_scroll: u16,
    /// Todo file content as of our last load or save
    disk_content: Option<String>,
}

impl App {
    pub fn new(store: TodoStore, data_dir: DataDir, config: Config) -> Self {
        let theme = Theme::from_config(&config.ui);
        let notes = data_dir.note_store();
        let mut panel = PanelState::default();
        if !store.is_empty() {
            panel.set_highlighted(1);
        }
        App {
            store,
            panel,
            data_dir,
            notes,
            config,
            theme,
            mode: Mode::Navigate,
            focus: Focus::Todos,
            prompt: None,
            confirm: None,
            pending_external: None,
            status_message: None,
            status_is_error: false,
            dirty: false,
            should_quit: false,
            last_search: None,
            preview_scroll: 0,
            disk_content: None,
        }
    }

    /// The highlighted todo, if the highlight points at one
    pub fn selected(&self) -> Option<&TodoItem> {
        self.store.item_at(self.panel.highlighted).ok()
    }

    pub fn selected_id(&self) -> Result<TodoId, AppError> {
        self.selected()
            .map(|t| t.id)
            .ok_or(AppError::NothingSelected)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        // The status row is a single line
        let message = err.to_string().lines().map(str::trim).collect::<Vec<_>>().join(" ");
        log::warn!("command failed: {}", message);
        self.status_message = Some(message);
        self.status_is_error = true;
    }

    pub fn open_prompt(&mut self, prompt: PromptState) {
        self.prompt = Some(prompt);
        self.mode = Mode::Prompt;
    }

    pub fn ask(&mut self, action: ConfirmAction) {
        self.confirm = Some(action);
        self.mode = Mode::Confirm;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Todos => Focus::Preview,
            Focus::Preview => Focus::Todos,
        };
    }

    // -----------------------------------------------------------------------
    // Cursor upkeep
    // -----------------------------------------------------------------------

    /// Highlight `id` and scroll it into view
    fn select(&mut self, id: TodoId) {
        if let Ok(pos) = self.store.position_of(id) {
            self.panel.set_highlighted(pos);
        }
        self.fix_cursor();
    }

    /// Bring the cursors back in range after the store changed size
    fn fix_cursor(&mut self) {
        self.panel.clamp_to(self.store.len());
        self.panel.scroll_into_view(self.panel.viewport_capacity);
        self.preview_scroll = 0;
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let target = (self.panel.highlighted as isize)
            .saturating_add(delta)
            .clamp(1, len as isize);
        self.panel.set_highlighted(target as usize);
        self.panel.scroll_into_view(self.panel.viewport_capacity);
        self.preview_scroll = 0;
    }

    /// Move a viewport's worth of rows up (`-1`) or down (`1`)
    pub fn page(&mut self, direction: isize) {
        let step = self.panel.viewport_capacity.max(1) as isize;
        self.move_highlight(direction * step);
    }

    pub fn go_first(&mut self) {
        self.move_highlight(isize::MIN);
    }

    pub fn go_last(&mut self) {
        self.move_highlight(isize::MAX);
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Record a change and write it out when autosave is on
    fn changed(&mut self) {
        self.dirty = true;
        if self.config.general.autosave
            && let Err(e) = self.save()
        {
            self.set_error(e);
        }
    }

    pub fn save(&mut self) -> Result<(), AppError> {
        let content = todo_io::save_todos(&self.data_dir, &self.store)?;
        self.disk_content = Some(content);
        self.dirty = false;
        Ok(())
    }

    pub fn add_todo(&mut self, message: &str, priority: Priority) -> Result<(), AppError> {
        let id = self.store.add(message, i32::from(priority.get()), None)?;
        log::info!("added todo (priority {}): {}", priority, message);
        self.select(id);
        self.changed();
        Ok(())
    }

    pub fn delete_todo(&mut self, id: TodoId) -> Result<(), AppError> {
        let item = self.store.delete(id)?;
        log::info!("deleted todo: {}", item.message);
        if self.panel.last_saved_message.as_ref() == Some(&item.message) {
            self.panel.last_saved_message = None;
        }
        self.fix_cursor();
        self.changed();
        Ok(())
    }

    pub fn detach_note(&mut self, id: TodoId) -> Result<(), AppError> {
        let note = self.store.detach_note(id)?;
        log::info!("detached note {}", note);
        self.changed();
        Ok(())
    }

    pub fn toggle_completed(&mut self, id: TodoId) -> Result<(), AppError> {
        self.store.flag_completed(id)?;
        self.changed();
        Ok(())
    }

    pub fn change_priority(&mut self, id: TodoId, delta: i32) -> Result<(), AppError> {
        let new_id = self.store.change_priority(id, delta)?;
        self.select(new_id);
        self.changed();
        Ok(())
    }

    pub fn edit_message(&mut self, id: TodoId, message: &str) -> Result<(), AppError> {
        self.store.set_message(id, message)?;
        self.changed();
        Ok(())
    }

    fn set_note(&mut self, id: TodoId, note: Option<NoteRef>) -> Result<(), AppError> {
        self.store.attach_note(id, note)?;
        self.changed();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Case-insensitive regex for a search pattern. Invalid regex syntax
    /// falls back to a literal match.
    pub fn search_regex(pattern: &str) -> Option<Regex> {
        Regex::new(&format!("(?i){}", pattern))
            .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
            .ok()
    }

    /// Highlight the next (or previous) todo matching the last search,
    /// wrapping around. Returns false when nothing matches.
    pub fn search_next(&mut self, forward: bool) -> bool {
        let Some(re) = self.last_search.as_deref().and_then(Self::search_regex) else {
            return false;
        };
        let len = self.store.len();
        if len == 0 {
            return false;
        }
        let start = self.panel.highlighted.saturating_sub(1);
        for step in 1..=len {
            let idx = if forward {
                (start + step) % len
            } else {
                (start + len - step % len) % len
            };
            let matched = self
                .store
                .item_at(idx + 1)
                .is_ok_and(|item| re.is_match(&item.message));
            if matched {
                self.panel.set_highlighted(idx + 1);
                self.panel.scroll_into_view(self.panel.viewport_capacity);
                self.preview_scroll = 0;
                return true;
            }
        }
        self.set_error(format!(
            "pattern not found: {}",
            self.last_search.clone().unwrap_or_default()
        ));
        false
    }

    // -----------------------------------------------------------------------
    // Disk sync
    // -----------------------------------------------------------------------

    /// Replace the store with the todo file's current content
    pub fn reload(&mut self) -> Result<(), AppError> {
        let (store, content) = todo_io::load_todos_with_source(&self.data_dir)?;
        self.store = store;
        self.disk_content = content;
        self.dirty = false;
        if self.panel.highlighted == 0 && !self.store.is_empty() {
            self.panel.set_highlighted(1);
        }
        self.fix_cursor();
        self.set_status(format!("reloaded {} todos", self.store.len()));
        Ok(())
    }

    /// Called when the watcher reports the todo file changed. Our own saves
    /// are recognised by content and ignored.
    pub fn handle_disk_change(&mut self) {
        let current = fs::read_to_string(self.data_dir.todo_path()).ok();
        if current == self.disk_content {
            return;
        }
        log::info!("todo file changed on disk");
        if self.dirty {
            self.set_error("todo file changed on disk: R reloads, s overwrites");
        } else if let Err(e) = self.reload() {
            self.set_error(e);
        }
    }

    /// Remember what is on disk right now (after the initial load)
    pub fn set_disk_content(&mut self, content: Option<String>) {
        self.disk_content = content;
    }

    // -----------------------------------------------------------------------
    // External programs
    // -----------------------------------------------------------------------

    /// Run an editor or pager. The caller owns the terminal state.
    pub fn run_external(&mut self, cmd: ExternalCommand) -> Result<(), AppError> {
        match cmd {
            ExternalCommand::EditNote(id) => {
                let current = self
                    .store
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("{:?}", id)))?
                    .note
                    .clone();
                let editor = self.config.external.editor_command();
                let edited = self.notes.edit(current.as_ref(), &editor)?;
                if edited != current {
                    self.set_note(id, edited)?;
                }
            }
            ExternalCommand::ViewNote(id) => {
                let note = self
                    .store
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(format!("{:?}", id)))?
                    .note
                    .clone()
                    .ok_or(StoreError::NoNoteAttached)?;
                let pager = self.config.external.pager_command();
                self.notes.view(&note, &pager)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // UI state
    // -----------------------------------------------------------------------

    /// Restore cursors and last search from .state.json
    pub fn restore_ui_state(&mut self) {
        if let Some(state) = read_ui_state(&self.data_dir.state_path()) {
            self.panel.set_highlighted(state.highlighted);
            self.panel.set_first_visible(state.first_visible);
            self.last_search = state.last_search;
        }
        self.panel.clamp_to(self.store.len());
    }

    pub fn save_ui_state(&self) {
        let state = UiState {
            highlighted: self.panel.highlighted,
            first_visible: self.panel.first_visible,
            last_search: self.last_search.clone(),
        };
        if let Err(e) = write_ui_state(&self.data_dir.state_path(), &state) {
            log::warn!("could not save UI state: {}", e);
        }
    }
}

/// Run the TUI against `data_dir`
pub fn run(data_dir: DataDir, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    data_dir.ensure()?;
    let _lock = DataLock::try_acquire(data_dir.root())?;
    let (store, content) = todo_io::load_todos_with_source(&data_dir)?;

    let mut app = App::new(store, data_dir, config);
    app.set_disk_content(content);
    app.restore_ui_state();

    let watcher = match TodoWatcher::start(&app.data_dir.todo_path()) {
        Ok(w) => Some(w),
        Err(e) => {
            log::warn!("file watching disabled: {}", e);
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    app.save_ui_state();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&TodoWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if let Some(cmd) = app.pending_external.take() {
            suspend_terminal(terminal)?;
            let result = app.run_external(cmd);
            resume_terminal(terminal)?;
            if let Err(e) = result {
                app.set_error(e);
            }
            continue;
        }

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if watcher.is_some_and(TodoWatcher::poll) {
            app.handle_disk_change();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn suspend_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn std::error::Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn resume_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}
