mod app;
mod config;
mod domain;
mod enrich;
mod input;
mod notifications;
mod persistence;
mod report;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::Schedule;
use enrich::{Enricher, EnrichmentClient, GeminiBackend, RetryPolicy};
use persistence::{
    config_file, ensure_data_dir, get_data_dir, init_local_data_dir, load_metadata, load_schedule,
    load_trip, log_file, meta_file, save_trip, schedule_file, seed_trip, trip_file, AppMetadata,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "tabi")]
#[command(about = "A terminal travel itinerary planner with AI-filled stop details", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .tabi directory in the current directory
    Init,
    /// Write a Markdown itinerary report
    Report {
        /// Day to report on (MM/DD). Defaults to the whole trip.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/report-<date>.md
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Send tracing output to the log file; the terminal belongs to the TUI
fn init_logging(data_dir: &Path) {
    let path = log_file(data_dir);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tabi=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init();
    if let Err(e) = result {
        eprintln!("Logging disabled: {}", e);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            save_trip(&trip_file(&data_dir), &seed_trip())?;
            println!("Initialized tabi directory: {}", data_dir.display());
            println!();
            println!("Edit trip.json there to describe your days, flights and stays.");
            println!("Run 'tabi' to start planning.");
            Ok(())
        }
        Some(Commands::Report { date, output }) => {
            let data_dir = get_data_dir()?;
            init_logging(&data_dir);
            let output_path = output.map(PathBuf::from);

            match &date {
                Some(d) => println!("Generating report for {}...", d),
                None => println!("Generating report for the whole trip..."),
            }
            let report_path = report::generate_report(&data_dir, date.as_deref(), output_path)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        None => run_tui(),
    }
}

fn run_tui() -> Result<()> {
    let data_dir = ensure_data_dir()?;
    init_logging(&data_dir);
    eprintln!("Using tabi directory: {}", data_dir.display());
    info!(dir = %data_dir.display(), "starting");

    let config = Config::load(&config_file(&data_dir));
    let schedule = Schedule::new(load_schedule(&schedule_file(&data_dir)));
    let trip = load_trip(&trip_file(&data_dir));
    let metadata = load_metadata(meta_file(&data_dir)).unwrap_or_else(|e| {
        warn!("ignoring stored preferences: {:#}", e);
        AppMetadata::default()
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut app = AppState::new(schedule, trip, config.clone(), metadata, Some(data_dir));
    match GeminiBackend::new(&config) {
        Ok(backend) => {
            let client = EnrichmentClient::new(Arc::new(backend), RetryPolicy::from(&config.retry));
            app = app.with_enricher(Enricher::new(runtime.handle().clone(), client));
        }
        Err(e) => warn!("enrichment disabled: {}", e),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.save() {
        eprintln!("Error saving state: {:#}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    runtime.shutdown_background();
    info!("stopped");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    config: &Config,
) -> Result<()> {
    let tick_rate = config.tick_rate();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        // Merge settled enrichment requests
        app.tick();

        if app.needs_save {
            app.save_logged();
        }
    }
}
