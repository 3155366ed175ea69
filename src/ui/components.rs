//! Shared UI components: status bar and the controls line.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::app::keymap::KeyAction;

fn key_label(app: &AppState, action: KeyAction) -> String {
    app.keymap.key_for(action).unwrap_or_else(|| "-".to_string())
}

/// The two screen controls, rendered as buttons with their keys.
pub fn render_controls(f: &mut Frame, area: Rect, app: &AppState) {
    let button = Style::default()
        .fg(app.theme.header_fg)
        .bg(app.theme.header_bg)
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(format!(" [{}] Refetch ", key_label(app, KeyAction::Refetch)), button),
        Span::raw("  "),
        Span::styled(format!(" [{}] Add Fake Users ", key_label(app, KeyAction::AddFakeUsers)), button),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Status bar text. Request counters only appear once the list is loaded.
pub fn status_text(app: &AppState) -> String {
    let mut msg = String::new();
    if app.controls_visible() {
        msg.push_str(&format!(
            "reads:{}  writes:{}",
            app.reads_in_flight, app.writes_in_flight
        ));
        if let Some(every) = app.poll_interval {
            msg.push_str(&format!("  polling:{}s", every.as_secs()));
        }
        msg.push_str("  ");
    }
    msg.push_str(&format!("{}: quit", key_label(app, KeyAction::Quit)));
    msg
}

/// Bottom status bar.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let msg = status_text(app);
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}
