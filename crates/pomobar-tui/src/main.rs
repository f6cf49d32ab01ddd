mod app;
mod host;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use host::{Notifier, StatusLine};
use pomobar_core::models::{validate_log_level, DurationKind};
use pomobar_engine::{ConfigManager, SessionTimer, Surfaces, TimerEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Duration;
use tracing::info;

fn setup_logging(level: &str) -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("pomobar-tui.log");

    let log_file = std::fs::File::create(log_path)?;
    let filter = format!(
        "pomobar={level},pomobar_engine={level},pomobar_core={level}",
        level = level
    );
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);

        tracing::error!(?panic_info, "Application panicked");

        eprintln!("A fatal error occurred: {}", panic_info);

        original_hook(panic_info);
    }));
}

#[derive(Parser, Debug)]
#[command(name = "pomobar")]
#[command(about = "Pomobar - work/break interval timer", long_about = None)]
struct Args {
    /// Work duration in minutes
    #[arg(short, long)]
    work_minutes: Option<String>,

    /// Break duration in minutes
    #[arg(short, long)]
    break_minutes: Option<String>,

    /// Start the work countdown immediately
    #[arg(short, long)]
    autostart: bool,

    /// Overrides the log level from config.json
    #[arg(short, long)]
    log_level: Option<String>,

    /// Path to config.json
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn ring_bell() {
    print!("\x07");
    let _ = std::io::Write::flush(&mut std::io::stdout());
}

fn handle_timer_event(app: &App, event: &TimerEvent) {
    if app.should_ring(event) {
        ring_bell();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::from_file(path.clone()),
        None => ConfigManager::new(),
    }
    .context("Failed to load config")?;
    let config = config_manager.get().await;

    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    validate_log_level(log_level).context("Invalid --log-level")?;
    setup_logging(log_level)?;
    setup_panic_hook();
    info!("Pomobar starting up");
    tracing::debug!("Loaded config from {}", config_manager.path().display());

    let status = Arc::new(StatusLine::default());
    let notifier = Arc::new(Notifier::new(config.notifications.desktop));
    let timer = SessionTimer::new(Surfaces::new(status.clone(), notifier.clone()));

    if let Some(minutes) = &args.work_minutes {
        let _ = timer.configure(DurationKind::Work, minutes).await;
    }
    if let Some(minutes) = &args.break_minutes {
        let _ = timer.configure(DurationKind::Break, minutes).await;
    }

    let mut events = timer.subscribe();

    let mut app = App::new(
        timer.clone(),
        config_manager,
        status,
        notifier,
        config.notifications.bell,
    );

    if args.autostart {
        timer.start(true).await;
    }
    if config.open_panel_on_start {
        app.open_panel().await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            received = events.recv() => {
                match received {
                    Ok(event) => handle_timer_event(&app, &event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Timer event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(16)) => {
                if event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            app.handle_key(key.code, key.modifiers).await;
                        }
                        Event::Resize(width, height) => {
                            info!(width, height, "Terminal resized");
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    timer.shutdown().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Pomobar shut down");
    Ok(())
}
