//! Application state types and entry glue.
//!
//! Defines the pages, the TUI state, the colour theme and the helpers that
//! locate configuration files, and re-exports the event loop as `run`.
//!
pub mod keymap;
pub mod rent;
pub mod update;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use ratatui::style::Color;
use tracing::info;

use crate::api::{Book, LibraryApi, User};
use crate::error::{Context, Result};
use crate::notify::ToastQueue;
use keymap::Keymap;
use rent::RentPage;

/// Screens reachable from the sidebar, in sidebar order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Rent,
    Books,
    CreateUser,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Rent, Page::Books, Page::CreateUser];

    /// Short title shown in the header and the sidebar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Rent => "Rent",
            Page::Books => "Books",
            Page::CreateUser => "Create user",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Page::Rent => "Rent books",
            Page::Books => "Books",
            Page::CreateUser => "Register new user",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rent" => Some(Page::Rent),
            "books" => Some(Page::Books),
            "create-user" | "create_user" | "users" => Some(Page::CreateUser),
            _ => None,
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    SearchBooks,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub focus: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
    pub button: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            focus: Color::Rgb(0xf9, 0xe2, 0xaf),        // yellow
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
            button: Color::Rgb(0xeb, 0xa0, 0xac),       // maroon
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
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            if let Some(slot) = theme.slot_mut(key) {
                *slot = color;
            }
        }

        Some(theme)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "focus" => &mut self.focus,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            "button" => &mut self.button,
            _ => return None,
        })
    }

    fn entries(&self) -> [(&'static str, Color); 14] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("focus", self.focus),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
            ("button", self.button),
        ]
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
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
        buf.push_str("# libmanager theme configuration\n");
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

        for (k, v) in self.entries() {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        }

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default theme and return it.
    /// If present, load from it; on read errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Per-user configuration directory: `$XDG_CONFIG_HOME/libmanager`, else
/// `$HOME/.config/libmanager`, else the working directory.
pub fn default_config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("libmanager");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join("libmanager");
    }
    PathBuf::from(".")
}

/// Path of `name` inside `dir`, creating `dir` if needed.
pub fn config_file_path(dir: &Path, name: &str) -> Result<String> {
    std::fs::create_dir_all(dir).with_ctx(|| format!("create config dir {}", dir.display()))?;
    Ok(dir.join(name).to_string_lossy().into_owned())
}

/// Read-only data fetched once before the first frame.
#[derive(Clone, Debug, Default)]
pub struct PageData {
    pub users: Vec<User>,
    pub books: Vec<Book>,
}

impl PageData {
    /// Fetch the full user and book lists, users first.
    pub fn load(api: &dyn LibraryApi) -> Result<Self> {
        let users = api.list_users().with_ctx(|| "load users".to_string())?;
        let books = api.list_books().with_ctx(|| "load books".to_string())?;
        info!(users = users.len(), books = books.len(), "page data loaded");
        Ok(Self { users, books })
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub api: Arc<dyn LibraryApi>,
    /// Backend address shown in the status bar.
    pub api_label: String,
    pub users: Vec<User>,
    pub books_all: Vec<Book>,
    pub books: Vec<Book>,
    pub active_page: Page,
    pub selected_book_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub rent: RentPage,
    pub toasts: ToastQueue,
}

impl AppState {
    /// Build the state from already-fetched page data. Performs no I/O.
    pub fn new(api: Arc<dyn LibraryApi>, data: PageData, theme: Theme, keymap: Keymap) -> Self {
        let rent = RentPage::new(&data.users, &data.books);
        Self {
            started_at: Instant::now(),
            api,
            api_label: String::new(),
            users: data.users,
            books: data.books.clone(),
            books_all: data.books,
            active_page: Page::Rent,
            selected_book_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            rent,
            toasts: ToastQueue::new(),
        }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.active_page = page;
        self
    }

    pub fn with_api_label(mut self, label: impl Into<String>) -> Self {
        self.api_label = label.into();
        self
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
