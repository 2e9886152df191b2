use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Defaults
// =============================================================================

/// Registry file, relative to the working directory
pub const DEFAULT_REGISTRY_PATH: &str = "registry.json";

/// Directory holding hook scripts, relative to the working directory
pub const DEFAULT_HOOKS_DIR: &str = "hooks";

/// Timeout for a single page fetch in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Environment variable holding the tracing filter
pub const LOG_FILTER_ENV: &str = "VERDOG_LOG";

const REGISTRY_ENV: &str = "VERDOG_REGISTRY";
const HOOKS_DIR_ENV: &str = "VERDOG_HOOKS_DIR";
const FETCH_TIMEOUT_ENV: &str = "VERDOG_FETCH_TIMEOUT_MS";
const DESKTOP_NOTIFY_ENV: &str = "VERDOG_DESKTOP_NOTIFY";

/// Runtime configuration resolved from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub registry_path: PathBuf,
    pub hooks_dir: PathBuf,
    pub fetch_timeout: Duration,
    /// Raise an OS notification in addition to console output
    pub desktop_notify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            hooks_dir: PathBuf::from(DEFAULT_HOOKS_DIR),
            fetch_timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
            desktop_notify: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            registry_path: lookup(REGISTRY_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.registry_path),
            hooks_dir: lookup(HOOKS_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.hooks_dir),
            fetch_timeout: lookup(FETCH_TIMEOUT_ENV)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
            desktop_notify: lookup(DESKTOP_NOTIFY_ENV)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.desktop_notify),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Returns the path to the data directory for verdog.
/// Uses $XDG_DATA_HOME/verdog if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/verdog,
/// or ./verdog if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("verdog.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("verdog")
}
