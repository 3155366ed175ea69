//! Application state types and entry glue.
//!
//! Defines the screen state machine for the user directory, the theme, and
//! helpers to locate config files. The event loop lives in `update`
//! (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::client::{ClientEvent, QueryClient, RequestId};
use crate::gql::{ReadOp, UserListView, WriteOp};

/// Number of synthetic users created per "Add Fake Users" activation.
pub const FAKE_USERS_PER_ADD: u32 = 1;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-directory theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        for (k, v) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        }

        std::fs::write(path, buf)
    }

    /// Load `path` (or the same file name from the config dir); if neither
    /// exists, write the default theme to `path` and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path(file_name_of(path)) {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Look for `name` in `$XDG_CONFIG_HOME/user-directory/` then `~/.config/user-directory/`.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(xdg).join("user-directory").join(name));
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(home).join(".config").join("user-directory").join(name));
    }
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

pub(crate) fn file_name_of(path: &str) -> &str {
    std::path::Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// What the screen shows. Replaced as reads resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Failed(String),
    Loaded(UserListView),
}

pub struct AppState {
    pub started_at: Instant,
    pub view: ViewState,
    pub selected_user_index: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    /// Reads issued but not yet resolved.
    pub reads_in_flight: usize,
    /// Writes issued but not yet resolved.
    pub writes_in_flight: usize,
    /// Id of the newest read whose result was applied.
    pub last_applied_read: Option<RequestId>,
    pub poll_interval: Option<Duration>,
    pub last_read_issued_at: Option<Instant>,
}

impl AppState {
    pub fn new(theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            view: ViewState::Loading,
            selected_user_index: 0,
            rows_per_page: 10,
            theme,
            keymap,
            reads_in_flight: 0,
            writes_in_flight: 0,
            last_applied_read: None,
            poll_interval: None,
            last_read_issued_at: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Option<Duration>) -> Self {
        self.poll_interval = interval.filter(|d| !d.is_zero());
        self
    }

    /// Initial display: issue the read and show the loading indicator.
    pub fn mount(&mut self, client: &QueryClient) -> RequestId {
        self.view = ViewState::Loading;
        self.issue_read(client)
    }

    /// Re-issue the read with no parameters. A loaded view stays on screen
    /// until the new result arrives.
    pub fn refetch(&mut self, client: &QueryClient) -> RequestId {
        if matches!(self.view, ViewState::Failed(_)) {
            self.view = ViewState::Loading;
        }
        self.issue_read(client)
    }

    /// Issue the fake-user write and mark the user list stale. Only available
    /// once a list is on screen.
    pub fn add_fake_users(&mut self, client: &QueryClient) -> Option<RequestId> {
        if !self.controls_visible() {
            return None;
        }
        self.writes_in_flight += 1;
        Some(client.mutate(
            WriteOp::AddFakeUsers {
                count: FAKE_USERS_PER_ADD,
            },
            vec![ReadOp::AllUsers],
        ))
    }

    fn issue_read(&mut self, client: &QueryClient) -> RequestId {
        self.reads_in_flight += 1;
        self.last_read_issued_at = Some(Instant::now());
        client.query(ReadOp::AllUsers)
    }

    /// Fold a finished request into the view.
    pub fn apply(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Read { id, result, .. } => {
                self.reads_in_flight = self.reads_in_flight.saturating_sub(1);
                if self.last_applied_read.is_some_and(|last| id < last) {
                    tracing::debug!(id, "dropping stale read result");
                    return;
                }
                self.last_applied_read = Some(id);
                match result {
                    Ok(list) => {
                        tracing::info!(id, total = list.total_users, rows = list.all_users.len(), "user list loaded");
                        self.view = ViewState::Loaded(list);
                        self.clamp_selection();
                    }
                    Err(err) => {
                        tracing::info!(id, error = %err, "user list failed");
                        self.view = ViewState::Failed(err.to_string());
                    }
                }
            }
            ClientEvent::Write { id, result, .. } => {
                self.writes_in_flight = self.writes_in_flight.saturating_sub(1);
                match result {
                    // The client issues the refetch; count it as outstanding.
                    Ok(created) => {
                        tracing::info!(id, created = created.len(), "fake users added");
                        self.reads_in_flight += 1;
                        self.last_read_issued_at = Some(Instant::now());
                    }
                    // Not shown on screen and not retried.
                    Err(_) => {}
                }
            }
        }
    }

    /// Re-issue the read if polling is on and the interval has passed.
    /// A failed read stays on screen and is not retried by the timer.
    pub fn poll_due(&mut self, client: &QueryClient, now: Instant) -> Option<RequestId> {
        let interval = self.poll_interval?;
        if matches!(self.view, ViewState::Failed(_)) {
            return None;
        }
        let last = self.last_read_issued_at.unwrap_or(self.started_at);
        if now.duration_since(last) >= interval {
            Some(self.issue_read(client))
        } else {
            None
        }
    }

    pub fn controls_visible(&self) -> bool {
        matches!(self.view, ViewState::Loaded(_))
    }

    pub fn user_count(&self) -> usize {
        match &self.view {
            ViewState::Loaded(list) => list.all_users.len(),
            _ => 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.user_count();
        if len == 0 {
            self.selected_user_index = 0;
            return;
        }
        let next = self.selected_user_index as isize + delta;
        self.selected_user_index = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.user_count();
        if self.selected_user_index >= len {
            self.selected_user_index = len.saturating_sub(1);
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
