mod api;
mod app;
mod components;
mod config;
mod forms;
mod logging;
mod models;
mod tui;

use anyhow::{Context, Result};
use api::clinic::Clinic;
use app::App;
use config::Config;
use crossterm::terminal::{self, LeaveAlternateScreen};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tui::Tui;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;
    logging::init(config.log_file())?;

    let clinic = Arc::new(
        Clinic::connect(config.api_url()).context("cannot set up the HTTP client")?,
    );

    let _guard = CleanupGuard;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut tui = Tui::new(terminal, config.tick_rate());
    tui.init()?;

    tracing::info!("starting");
    let mut app = App::new(clinic, config);
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        tracing::error!(error = %e, "application error");
        eprintln!("Application Error: {e}");
    }
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Ignore errors during cleanup
        let _ = terminal::disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
    }
}
