use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::AppState;
use crate::gql::UserListView;

/// Logical size of every avatar image.
pub const AVATAR_SIZE: u16 = 48;
/// Terminal columns reserved for the avatar cell.
pub const AVATAR_CELL_WIDTH: u16 = 20;

/// Image shown at the start of a list row. No alternate text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Avatar {
    pub src: String,
    pub width: u16,
    pub height: u16,
    pub alt: &'static str,
}

/// One rendered row, identified by the user's handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub avatar: Avatar,
    pub name: String,
}

/// Row models in the order the data source returned them.
pub fn list_entries(list: &UserListView) -> Vec<ListEntry> {
    list.all_users
        .iter()
        .map(|u| ListEntry {
            key: u.github_login.clone(),
            avatar: Avatar {
                src: u.avatar.clone(),
                width: AVATAR_SIZE,
                height: AVATAR_SIZE,
                alt: "",
            },
            name: u.name.clone(),
        })
        .collect()
}

/// Fit an avatar reference into the fixed-width cell, keeping the tail
/// (usually the file name).
fn avatar_cell_text(src: &str) -> String {
    let max = AVATAR_CELL_WIDTH as usize - 2;
    let chars: Vec<char> = src.chars().collect();
    let shown: String = if chars.len() > max {
        std::iter::once('…').chain(chars[chars.len() - (max - 1)..].iter().copied()).collect()
    } else {
        src.to_string()
    };
    format!("[{shown}]")
}

pub fn render_user_list(f: &mut Frame, area: Rect, app: &mut AppState, list: &UserListView) {
    let body_height = area.height.saturating_sub(2) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let entries = list_entries(list);
    let start = (app.selected_user_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(entries.len());
    let slice = entries.get(start..end).unwrap_or(&[]);

    let rows = slice.iter().enumerate().map(|(i, e)| {
        let style = if start + i == app.selected_user_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(avatar_cell_text(&e.avatar.src)).style(Style::default().fg(app.theme.muted)),
            Cell::from(e.name.clone()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(AVATAR_CELL_WIDTH), Constraint::Min(1)];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
