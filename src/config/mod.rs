//! Configuration for the forum client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/forum/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::ConnectionConfig;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;
mod ui;


pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use ui::{FileUi, UiConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_URL: &str = "http://127.0.0.1:8888";
const DEFAULT_APP_ID: &str = "forum";
const DEFAULT_ROLE: &str = "forum";
const DEFAULT_ZOME: &str = "posts";
const DEFAULT_THEME: &str = "holo";

/// Handshake timeout; zome calls themselves are never timed out
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Conductor endpoint
    pub url: String,

    /// Installed app id checked during the handshake
    pub installed_app_id: String,

    /// Role every call targets
    pub role_name: String,

    /// Zome every call targets
    pub zome_name: String,

    /// Theme name: "holo", "terminal"
    pub theme: String,

    /// Demo mode: in-memory conductor with seeded posts
    pub demo_mode: bool,

    /// UI behaviour
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            installed_app_id: DEFAULT_APP_ID.to_string(),
            role_name: DEFAULT_ROLE.to_string(),
            zome_name: DEFAULT_ZOME.to_string(),
            theme: DEFAULT_THEME.to_string(),
            demo_mode: false,
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub url: Option<String>,
    pub installed_app_id: Option<String>,
    pub role_name: Option<String>,
    pub zome_name: Option<String>,
    pub theme: Option<String>,
    pub demo_mode: Option<bool>,

    /// Optional [ui] section
    pub ui: Option<FileUi>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Config {
    /// Get the config file path: ~/.config/forum/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("forum").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but does not parse is fatal: silently falling
    /// back to defaults would point the client at the wrong conductor.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run: forum config --reset\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file layer with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let url = env("FORUM_URL")
            .or(file.url)
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let installed_app_id = env("FORUM_APP_ID")
            .or(file.installed_app_id)
            .unwrap_or_else(|| DEFAULT_APP_ID.to_string());

        // Role/zome: file only (they are part of the app, not the deployment)
        let role_name = file.role_name.unwrap_or_else(|| DEFAULT_ROLE.to_string());
        let zome_name = file.zome_name.unwrap_or_else(|| DEFAULT_ZOME.to_string());

        let theme = env("FORUM_THEME")
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        let demo_mode = env("FORUM_DEMO")
            .map(|v| is_truthy(&v))
            .or(file.demo_mode)
            .unwrap_or(false);

        Self {
            url,
            installed_app_id,
            role_name,
            zome_name,
            theme,
            demo_mode,
            ui: UiConfig::from_file(file.ui),
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    /// Connection settings for the HTTP transport
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.url.clone(),
            installed_app_id: self.installed_app_id.clone(),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}
