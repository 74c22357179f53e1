//! Config file handling: notebook defaults and TUI keybindings.

use std::fs;
use std::path::{Path, PathBuf};

use cellflow::Config;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Error, Result};

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub notebook: Config,
    pub keybindings: Keybindings,
}

/// Keybinding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub quit: KeyBinding,
    pub increase: KeyBinding,
    pub decrease: KeyBinding,
    pub jump_up: KeyBinding,
    pub jump_down: KeyBinding,
    pub reseed: KeyBinding,
    pub reset: KeyBinding,
    pub view_report: KeyBinding,
    pub toggle_timings: KeyBinding,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            quit: KeyBinding::Multiple(vec!["q".into(), "Ctrl+c".into()]),
            increase: KeyBinding::Multiple(vec!["Right".into(), "l".into(), "+".into()]),
            decrease: KeyBinding::Multiple(vec!["Left".into(), "h".into(), "-".into()]),
            jump_up: KeyBinding::Multiple(vec!["Up".into(), "PageUp".into(), "k".into()]),
            jump_down: KeyBinding::Multiple(vec!["Down".into(), "PageDown".into(), "j".into()]),
            reseed: KeyBinding::Single("n".into()),
            reset: KeyBinding::Single("0".into()),
            view_report: KeyBinding::Single("r".into()),
            toggle_timings: KeyBinding::Single("t".into()),
        }
    }
}

/// A keybinding that can be a single key or multiple alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    /// Check if the given key press matches this binding.
    ///
    /// `Ctrl+` bindings need the control modifier, all others must be pressed
    /// without it. Shift is ignored so that `+` and uppercase letters work on
    /// any layout.
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let hit = |s: &String| {
            parse_binding(s).is_some_and(|(key, ctrl)| {
                key == code && ctrl == modifiers.contains(KeyModifiers::CONTROL)
            })
        };
        match self {
            KeyBinding::Single(s) => hit(s),
            KeyBinding::Multiple(keys) => keys.iter().any(hit),
        }
    }

    /// First key of the binding, for help text.
    pub fn primary(&self) -> &str {
        match self {
            KeyBinding::Single(s) => s,
            KeyBinding::Multiple(keys) => keys.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Parse `"Ctrl+x"` or a plain key name. The flag is set for `Ctrl+`.
fn parse_binding(s: &str) -> Option<(KeyCode, bool)> {
    match s.strip_prefix("Ctrl+") {
        Some(rest) => parse_key(rest).map(|k| (k, true)),
        None => parse_key(s).map(|k| (k, false)),
    }
}

/// Parse a key string into a KeyCode.
fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Esc" | "Escape" => Some(KeyCode::Esc),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),
        "Home" => Some(KeyCode::Home),
        "End" => Some(KeyCode::End),
        "PageUp" => Some(KeyCode::PageUp),
        "PageDown" => Some(KeyCode::PageDown),
        "Up" => Some(KeyCode::Up),
        "Down" => Some(KeyCode::Down),
        "Left" => Some(KeyCode::Left),
        "Right" => Some(KeyCode::Right),
        "Space" => Some(KeyCode::Char(' ')),
        s if s.len() > 1 && s.starts_with('F') => s[1..].parse().ok().map(KeyCode::F),
        s if s.chars().count() == 1 => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

/// Default location of the config file.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cellflow").join("config.toml"))
}

/// Load the configuration.
///
/// An explicit `path` must exist and parse. The default file falls back to
/// defaults when it is missing or broken.
pub fn load(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        return parse(path, &contents);
    }

    let Some(path) = default_path() else {
        return Ok(AppConfig::default());
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    };

    Ok(parse(&path, &contents).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring config file");
        AppConfig::default()
    }))
}

fn parse(path: &Path, contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write the default configuration and return where it went.
pub fn write_default(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_path().ok_or(Error::NoConfigDir)?,
    };

    if path.exists() && !force {
        return Err(Error::Config {
            path,
            message: "file already exists (use --force to overwrite)".into(),
        });
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string(&AppConfig::default()).map_err(|e| Error::Config {
        path: path.clone(),
        message: e.to_string(),
    })?;
    fs::write(&path, contents)?;

    Ok(path)
}
