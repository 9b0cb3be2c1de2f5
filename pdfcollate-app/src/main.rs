//! pdfcollate - Reorder and merge PDF pages in the terminal.

mod app;
mod cli;
mod error;
mod logging;
mod terminal;
mod view;

use std::process;

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use pdfcollate::Session;
use pdfcollate::render::bind_renderer;
use pdfcollate::settings::SettingsStore;
use pdfcollate::utils::expand_selection;
use ratatui::Terminal;
use tracing::{debug, error};

use crate::app::{Action, App};
use crate::cli::Cli;
use crate::error::AppError;
use crate::terminal::{Backend, TerminalGuard};
use crate::view::PreviewCache;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!("closing application with error: {err}");
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let log_dir = logging::init(cli.log_dir.as_deref(), config.verbose)?;
    debug!(log_dir = %log_dir.display(), "starting application");

    let settings = SettingsStore::open(config.settings_path.clone())?;
    let renderer = bind_renderer(config.thumbnail_scale);
    let previews = renderer.is_available();
    let session = Session::from_config(&config, renderer);

    let mut app = App::new(session, settings, config.overwrite_mode);
    if !previews {
        app.set_status("PDFium not found, pages are listed without previews");
    }

    if !config.inputs().is_empty() {
        let cwd = std::env::current_dir()?;
        let items = config
            .inputs()
            .iter()
            .map(|path| path.to_string_lossy().into_owned());
        app.start_import(expand_selection(&cwd, items)?);
    }

    let mut guard = TerminalGuard::enter()?;
    let result = event_loop(&mut app, guard.terminal()).await;
    drop(guard);

    debug!("closing application");
    result
}

async fn event_loop(app: &mut App, terminal: &mut Terminal<Backend>) -> Result<(), AppError> {
    let mut events = EventStream::new();
    let mut preview = PreviewCache::default();

    loop {
        terminal.draw(|frame| view::view(app, frame, &mut preview))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key) {
                        Action::None => {}
                        Action::Quit => break,
                        Action::Export(destination) => {
                            app.set_status(format!("Saving {}", destination.display()));
                            terminal.draw(|frame| view::view(app, frame, &mut preview))?;
                            app.export(&destination).await;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            event = app.next_import_event() => app.on_import_event(event),
        }
    }

    Ok(())
}
