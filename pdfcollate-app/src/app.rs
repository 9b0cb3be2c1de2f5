//! Application state and key handling.
//!
//! [`App`] maps key presses onto [`Session`] operations. It never touches
//! the page list itself, so everything it does is also reachable (and
//! tested) through the library.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pdfcollate::config::OverwriteMode;
use pdfcollate::export::{OverwriteDecision, decide_overwrite, normalize_destination};
use pdfcollate::import::ImportEvent;
use pdfcollate::session::ImportNotice;
use pdfcollate::settings::SettingsStore;
use pdfcollate::utils::{expand_selection, split_input_line};
use pdfcollate::{PdfCollateError, Session};
use tracing::{debug, warn};

/// What a prompt line is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Files or glob patterns to import.
    Add,
    /// Destination of the export.
    Save,
}

/// A line of text being edited at the bottom of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
    /// Directory relative input is resolved against.
    pub base: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// The selected entry follows the cursor until dropped.
    Grab { origin: usize },
    /// Browsing the trash.
    Trash { selected: usize },
    Prompt(Prompt),
    ConfirmOverwrite { destination: PathBuf },
    /// Blocking message box, closed with Enter or Esc.
    Message { title: String, body: String },
}

/// Work the event loop has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Export(PathBuf),
    Quit,
}

pub struct App {
    session: Session,
    settings: SettingsStore,
    overwrite_mode: OverwriteMode,
    selected: usize,
    mode: Mode,
    status: String,
    import_failures: Vec<String>,
}

impl App {
    pub fn new(session: Session, settings: SettingsStore, overwrite_mode: OverwriteMode) -> Self {
        Self {
            session,
            settings,
            overwrite_mode,
            selected: 0,
            mode: Mode::Normal,
            status: String::from("Press a to add PDF files"),
            import_failures: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Start importing `paths` as one batch.
    pub fn start_import(&mut self, paths: Vec<PathBuf>) {
        let count = paths.len();
        match self.session.start_import(paths) {
            Ok(()) => {
                self.import_failures.clear();
                self.status = format!("Importing {count} file(s), Esc cancels");
            }
            Err(err) => self.show_error(&err),
        }
    }

    /// Wait for the next import event; pending while nothing is imported.
    pub async fn next_import_event(&mut self) -> ImportEvent {
        self.session.recv_import_event().await
    }

    /// Apply an import event plus everything else that is already queued.
    pub fn on_import_event(&mut self, event: ImportEvent) {
        let notice = self.session.handle_import_event(event);
        self.on_notice(notice);
        for notice in self.session.pump_import() {
            self.on_notice(notice);
        }
        self.clamp_selection();
    }

    fn on_notice(&mut self, notice: ImportNotice) {
        match notice {
            ImportNotice::Progress => {}
            ImportNotice::Failed(err) => {
                warn!(error = %err, "Skipped file");
                self.import_failures.push(err.user_message());
            }
            ImportNotice::Finished(summary) => {
                self.status = summary.describe();
                if !self.import_failures.is_empty() {
                    let body = std::mem::take(&mut self.import_failures).join("\n");
                    self.mode = Mode::Message {
                        title: String::from("Import"),
                        body,
                    };
                }
            }
        }
    }

    /// Export the list to `destination` and report the outcome.
    pub async fn export(&mut self, destination: &Path) {
        match self.session.export(destination).await {
            Ok(stats) => self.status = stats.describe(),
            Err(err) => self.show_error(&err),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return self.quit();
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.normal_key(key),
            Mode::Grab { origin } => {
                self.grab_key(key, origin);
                Action::None
            }
            Mode::Trash { selected } => {
                self.trash_key(key, selected);
                Action::None
            }
            Mode::Prompt(prompt) => self.prompt_key(key, prompt),
            Mode::ConfirmOverwrite { destination } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Action::Export(destination),
                _ => {
                    self.status = String::from("Save cancelled");
                    Action::None
                }
            },
            Mode::Message { title, body } => {
                if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.mode = Mode::Message { title, body };
                }
                Action::None
            }
        }
    }

    fn normal_key(&mut self, key: KeyEvent) -> Action {
        let len = self.session.list().len();
        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected.saturating_add(1)),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(len.saturating_sub(1)),
            KeyCode::Char('J') => self.move_selected(self.selected + 1),
            KeyCode::Char('K') if self.selected > 0 => self.move_selected(self.selected - 1),
            KeyCode::Char('m') | KeyCode::Enter if len > 0 => {
                self.mode = Mode::Grab {
                    origin: self.selected,
                };
                self.status = String::from("Moving page: j/k to move, Enter to drop, Esc to undo");
            }
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('u') => self.restore_latest(),
            KeyCode::Char('t') => self.mode = Mode::Trash { selected: 0 },
            KeyCode::Char('a') => self.open_prompt(PromptKind::Add),
            KeyCode::Char('s') => self.open_prompt(PromptKind::Save),
            KeyCode::Esc => {
                if self.session.cancel_import() {
                    self.status = String::from("Cancelling import");
                }
            }
            _ => {}
        }
        Action::None
    }

    fn grab_key(&mut self, key: KeyEvent, origin: usize) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selected(self.selected + 1),
            KeyCode::Char('k') | KeyCode::Up if self.selected > 0 => {
                self.move_selected(self.selected - 1)
            }
            KeyCode::Esc => {
                self.move_selected(origin);
                self.status = String::from("Move undone");
                return;
            }
            KeyCode::Enter | KeyCode::Char('m') => {
                self.status = format!("Page dropped at position {}", self.selected + 1);
                return;
            }
            _ => {}
        }
        self.mode = Mode::Grab { origin };
    }

    fn trash_key(&mut self, key: KeyEvent, selected: usize) {
        let len = self.session.trash().len();
        let selected = match key.code {
            KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('q') => return,
            KeyCode::Char('j') | KeyCode::Down => (selected + 1).min(len.saturating_sub(1)),
            KeyCode::Char('k') | KeyCode::Up => selected.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char('r') => {
                let id = self.session.trash().list().get(selected).map(|e| e.id());
                if let Some(position) = id.and_then(|id| self.session.restore(id)) {
                    self.selected = position;
                    self.status = String::from("Page restored at the end of the list");
                }
                selected.min(self.session.trash().len().saturating_sub(1))
            }
            _ => selected,
        };
        self.mode = Mode::Trash { selected };
    }

    fn prompt_key(&mut self, key: KeyEvent, mut prompt: Prompt) -> Action {
        match key.code {
            KeyCode::Esc => return Action::None,
            KeyCode::Enter => {
                return match prompt.kind {
                    PromptKind::Add => {
                        self.confirm_add(&prompt);
                        Action::None
                    }
                    PromptKind::Save => self.confirm_save(&prompt),
                };
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.input.clear();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => {}
        }
        self.mode = Mode::Prompt(prompt);
        Action::None
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.mode = Mode::Prompt(Prompt {
            kind,
            input: String::new(),
            base: self.settings.last_directory(),
        });
    }

    fn confirm_add(&mut self, prompt: &Prompt) {
        let items = split_input_line(&prompt.input);
        if items.is_empty() {
            return;
        }

        let paths = match expand_selection(&prompt.base, &items) {
            Ok(paths) => paths,
            Err(err) => return self.show_error(&err),
        };
        if paths.is_empty() {
            return self.show_error(&PdfCollateError::NothingToImport);
        }

        if let Some(dir) = paths[0].parent() {
            self.remember_directory(dir);
        }
        self.start_import(paths);
    }

    fn confirm_save(&mut self, prompt: &Prompt) -> Action {
        let input = prompt.input.trim();
        if input.is_empty() {
            return Action::None;
        }
        if self.session.is_importing() {
            self.show_error(&PdfCollateError::ImportInProgress);
            return Action::None;
        }
        if self.session.list().is_empty() {
            self.show_error(&PdfCollateError::EmptyInput);
            return Action::None;
        }

        let destination = match normalize_destination(&resolve_destination(&prompt.base, input)) {
            Ok(destination) => destination,
            Err(err) => {
                self.show_error(&err);
                return Action::None;
            }
        };
        if let Some(dir) = destination.parent() {
            self.remember_directory(dir);
        }

        match decide_overwrite(&destination, self.overwrite_mode) {
            OverwriteDecision::Write => Action::Export(destination),
            OverwriteDecision::Confirm => {
                self.mode = Mode::ConfirmOverwrite { destination };
                Action::None
            }
            OverwriteDecision::Refuse => {
                self.mode = Mode::Message {
                    title: String::from("Export"),
                    body: format!(
                        "{} already exists and overwriting is disabled",
                        destination.display()
                    ),
                };
                Action::None
            }
        }
    }

    fn remember_directory(&self, dir: &Path) {
        if let Err(err) = self.settings.set_last_directory(dir) {
            warn!(error = %err, "Failed to remember directory");
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.session.list().len().saturating_sub(1));
    }

    fn move_selected(&mut self, target: usize) {
        if target >= self.session.list().len() || target == self.selected {
            return;
        }
        match self.session.move_entry(self.selected, target) {
            Ok(()) => self.selected = target,
            Err(err) => self.show_error(&err),
        }
    }

    fn remove_selected(&mut self) {
        let Some(label) = self.session.list().get(self.selected).map(|e| e.describe()) else {
            return;
        };
        match self.session.remove(self.selected) {
            Ok(id) => {
                debug!(%id, "Removed page");
                self.status = format!("Moved {label} to the trash (u restores)");
                self.clamp_selection();
            }
            Err(err) => self.show_error(&err),
        }
    }

    fn restore_latest(&mut self) {
        if self.session.restore_latest().is_some() {
            self.selected = self.session.list().len() - 1;
            self.status = String::from("Page restored at the end of the list");
        }
    }

    fn quit(&mut self) -> Action {
        self.session.cancel_import();
        Action::Quit
    }

    fn show_error(&mut self, err: &PdfCollateError) {
        warn!(error = %err, "Showing error");
        self.mode = Mode::Message {
            title: err.title().to_string(),
            body: err.user_message(),
        };
    }
}

fn resolve_destination(base: &Path, input: &str) -> PathBuf {
    let input = input.trim_matches('"');
    let path = match (input.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    };
    base.join(path)
}
