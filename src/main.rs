//! user-directory binary entry point.
//!
//! Parses arguments, sets up logging, initializes the terminal in raw mode,
//! runs the TUI event loop, and restores the terminal state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;

use user_directory::app::{self, AppState, Theme, keymap::Keymap};
use user_directory::cli::Cli;
use user_directory::client::QueryClient;
use user_directory::error::{Context, Result};
use user_directory::gql::HttpDataSource;
use user_directory::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    logging::init(&cli.log_file)?;
    tracing::info!(endpoint = %cli.endpoint, "starting");

    let source = HttpDataSource::new(cli.endpoint.clone(), cli.timeout())?;
    let client = QueryClient::new(Arc::new(source));
    let mut state = AppState::new(Theme::load_or_init(&cli.theme), Keymap::load_or_init(&cli.keybinds))
        .with_poll_interval(cli.poll_interval());

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, &mut state, &client);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
