//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Keys without a binding fall through to the focused text input, so date
//! characters (digits and `-`) must stay unbound.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Start searching the books list.
    StartSearch,
    /// Go to the next page in the sidebar.
    NextPage,
    /// Go to the previous page in the sidebar.
    PrevPage,
    /// Move focus to the next form field.
    NextField,
    /// Move focus to the previous form field.
    PrevField,
    MoveUp,
    MoveDown,
    /// Jump one screen up in a list.
    PageUp,
    /// Jump one screen down in a list.
    PageDown,
    /// Press the focused control (the submit button on the rent page).
    Activate,
    /// Submit the rent form from any field.
    Submit,
    /// Close the visible notification.
    DismissToast,
    /// Swallow the key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 15] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::NextPage,
    KeyAction::PrevPage,
    KeyAction::NextField,
    KeyAction::PrevField,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Activate,
    KeyAction::Submit,
    KeyAction::DismissToast,
    KeyAction::Ignore,
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char(']')), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('[')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Tab), KeyAction::NextField);
        // Shift+Tab is BackTab in crossterm; some terminals add SHIFT, some send Tab+SHIFT
        bindings.insert((M::NONE, BackTab), KeyAction::PrevField);
        bindings.insert((M::SHIFT, BackTab), KeyAction::PrevField);
        bindings.insert((M::SHIFT, Tab), KeyAction::PrevField);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Enter), KeyAction::Activate);
        bindings.insert((M::CONTROL, Char('s')), KeyAction::Submit);
        bindings.insert((M::NONE, Esc), KeyAction::DismissToast);
        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't exist.
    ///
    /// A freshly created default keymap is written to `path` so it can be
    /// customised later.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file uses `<Action> = <KeySpec>[, <KeySpec>...]` lines. Bindings
    /// are layered on top of the defaults.
    ///
    /// # Returns
    ///
    /// `Some(keymap)` if the file exists and is readable; `None` otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let Some(action) = parse_action(lhs) else {
                continue;
            };
            for spec in rhs.split(',') {
                if let Some(key) = parse_key(spec) {
                    map.bindings.insert(key, action);
                }
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file, one action per line.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# libmanager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>[, <KeySpec>...]\n");
        buf.push_str("# KeySpec examples: q, Ctrl+s, Enter, Esc, Tab, BackTab, Up, Down, PageUp, PageDown, [, ]\n");
        buf.push_str("# Digits and '-' are reserved for date input.\n\n");

        for action in ALL_ACTIONS {
            let keys = self.keys_for(action);
            if keys.is_empty() {
                continue;
            }
            let _ = writeln!(&mut buf, "{} = {}", format_action(action), keys.join(", "));
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its corresponding action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Formatted key specs bound to `action`, sorted for stable output.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Format a key (modifiers + code) into a human-readable spec like "Ctrl+s", "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else if mods.contains(KeyModifiers::SHIFT) {
            format!("Shift+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = if let Some(after) = s.strip_prefix("Ctrl+") {
        (KeyModifiers::CONTROL, after)
    } else if let Some(after) = s.strip_prefix("Shift+") {
        (KeyModifiers::SHIFT, after)
    } else {
        (KeyModifiers::NONE, s)
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ALL_ACTIONS.into_iter().find(|a| format_action(*a) == s)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NextPage => "NextPage",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextField => "NextField",
        KeyAction::PrevField => "PrevField",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Activate => "Activate",
        KeyAction::Submit => "Submit",
        KeyAction::DismissToast => "DismissToast",
        KeyAction::Ignore => "Ignore",
    }
}
