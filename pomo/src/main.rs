use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod alerts;
mod app;
mod config;
mod ticker;
mod ui;

use app::App;
use config::Cli;
use ticker::{AppEvent, TickScheduler};

const FRAME_PERIOD: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level())?;

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_cli(&cli);
    info!(
        policy = ?config.timer.switch_policy,
        tick_ms = config.timer.tick_ms,
        "starting pomo"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = ticker::channel();
    ticker::spawn_input_reader(tx.clone());
    let app = App::new(config, TickScheduler::new(tx), Box::new(alerts::TerminalBell));
    let res = run_app(&mut terminal, app, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("pomo exited with an error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }
    info!("pomo stopped");

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut frame = tokio::time::interval(FRAME_PERIOD);

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if app.should_quit {
            // Dropping the app cancels any running tick task.
            return Ok(());
        }

        tokio::select! {
            Some(event) = rx.recv() => app.handle_event(event),
            _ = frame.tick() => {}
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let log_dir = config::project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
    let log_path = log_dir.join("pomo.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pomo={level},pomo_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
