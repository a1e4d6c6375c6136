// main.rs

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use task_tracker::{api::fetch_tasks, app::App, config::ClientConfig, logging, ui::run_app};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    if let Some(cache_dir) = dirs::cache_dir() {
        logging::init_file(&cache_dir.join("task-tracker").join("task-tracker.log"))?;
    }

    let config = ClientConfig::load()?;
    info!(backend_url = %config.backend_url, "starting client");

    // An unreachable backend still opens the UI; the footer shows the error
    let mut app = App::new(Vec::new());
    match fetch_tasks(&config.backend_url).await {
        Ok(tasks) => app.set_tasks(tasks),
        Err(err) => {
            warn!(error = %err, "initial fetch failed");
            app.message = Some(err.to_string());
        }
    }

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let res = run_app(&mut terminal, app, &config.backend_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
