use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use tvtable::Table;

mod app;
mod controller;
mod error;
mod loader;
mod ui;

use app::{App, Status};
use controller::Controller;
use error::ViewerError;

const EVENT_POLL_TIME_MS: u64 = 100;

/// Interactive terminal viewer for csv, parquet and arrow files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File to show, `~` and environment variables are expanded
    path: String,
    /// Rows per page, 0 fits the page to the terminal
    #[arg(long, default_value_t = 0)]
    page_size: usize,
    /// Number of leading columns kept visible while scrolling
    #[arg(long, default_value_t = 0)]
    freeze: usize,
    #[arg(long, default_value_t = 30)]
    max_column_width: usize,
    /// Prepend a column to select rows with space
    #[arg(long)]
    selectable: bool,
    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Write a log to this file, filtered by RUST_LOG
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Some(log) = &args.log
        && let Err(e) = init_logging(log)
    {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

/// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(path: &Path) -> Result<(), ViewerError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tvtable=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn build_table(args: &Args, loaded: loader::LoadedTable) -> Table {
    let table = Table::new(loaded.columns)
        .with_rows(loaded.rows)
        .with_focused(true)
        .with_filtered(true)
        .with_page_size(args.page_size)
        .with_horizontal_freeze_column_count(args.freeze)
        .with_selectable_rows(args.selectable)
        .with_missing_data_indicator("∅");
    match &args.sort {
        Some(column) if args.desc => table.sort_by_desc(column.as_str()),
        Some(column) => table.sort_by_asc(column.as_str()),
        None => table,
    }
}

fn run(args: Args) -> Result<(), ViewerError> {
    let path = shellexpand::full(&args.path)
        .map_err(|e| ViewerError::loading_failed(e.to_string()))?;
    let loaded = loader::load_data_file(PathBuf::from(path.as_ref()), args.max_column_width)?;
    info!("Loaded {} rows from {}", loaded.rows.len(), loaded.name);

    let name = loaded.name.clone();
    let table = build_table(&args, loaded);
    let controller = Controller::new(EVENT_POLL_TIME_MS);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, App::new(name, table), &controller);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: App,
    controller: &Controller,
) -> Result<(), ViewerError> {
    let size = terminal.size()?;
    let mut app = app.update(Controller::resize(size.width, size.height));
    while app.status() != Status::Quitting {
        terminal.draw(|f| ui::draw(&app, f))?;
        if let Some(message) = controller.handle_event(app.table())? {
            app = app.update(message);
        }
    }
    Ok(())
}
