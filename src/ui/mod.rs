pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, ViewState};

pub use users::{Avatar, ListEntry, list_entries};

pub const LOADING_TEXT: &str = "Loading users...";

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let header = Paragraph::new("user-directory")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(
            Style::default()
                .fg(app.theme.title)
                .bg(app.theme.header_bg)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(header, root[0]);

    render_body(f, root[1], app);
    components::render_status_bar(f, root[2], app);
}

fn render_body(f: &mut Frame, area: Rect, app: &mut AppState) {
    // Owned so the list can be rendered while `app` is borrowed mutably.
    match app.view.clone() {
        ViewState::Loading => {
            let p = Paragraph::new(LOADING_TEXT).style(Style::default().fg(app.theme.text));
            f.render_widget(p, area);
        }
        ViewState::Failed(message) => {
            let p = Paragraph::new(format!("Error! {message}"))
                .style(Style::default().fg(app.theme.text))
                .wrap(Wrap { trim: false });
            f.render_widget(p, area);
        }
        ViewState::Loaded(list) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(2)])
                .split(area);
            let count = Paragraph::new(format!("{} Users", list.total_users))
                .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
            f.render_widget(count, parts[0]);
            components::render_controls(f, parts[1], app);
            users::render_user_list(f, parts[2], app, &list);
        }
    }
}
