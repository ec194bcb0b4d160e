use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::WriteLogger;
use std::fs::File;
use std::io;
use std::time::Instant;

use snekrs_sync::app::App;
use snekrs_sync::config::{Cli, Config};

fn main() -> Result<(), io::Error> {
    let config = Config::from(Cli::parse());

    // Set up logging before anything else
    WriteLogger::init(
        config.log_level,
        simplelog::Config::default(),
        File::create(&config.log_file)?,
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    info!("Starting snekrs-sync");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, Instant::now());
    let result = app.run(&mut terminal);
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Session ended");
    result
}
