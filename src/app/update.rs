use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};

use crate::app::AppState;
use crate::app::keymap::KeyAction;
use crate::client::QueryClient;
use crate::ui;

/// Whether the loop should keep going after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState, client: &QueryClient) -> Result<()> {
    app.mount(client);

    loop {
        while let Some(ev) = client.try_next() {
            app.apply(ev);
        }
        app.poll_due(client, Instant::now());

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, client, key) == Flow::Quit {
                    break;
                }
            }
        }
    }
    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Resolve a key through the keymap and act on it.
pub fn handle_key(app: &mut AppState, client: &QueryClient, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        // Controls only exist once the list is on screen.
        KeyAction::Refetch if app.controls_visible() => {
            app.refetch(client);
        }
        KeyAction::AddFakeUsers => {
            app.add_fake_users(client);
        }
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-(app.rows_per_page as isize)),
        KeyAction::PageDown => app.move_selection(app.rows_per_page as isize),
        KeyAction::Refetch | KeyAction::Ignore => {}
    }
    Flow::Continue
}
