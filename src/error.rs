use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Registry file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Pattern has no capture group named `Version`")]
    MissingGroup,

    #[error("Pattern did not produce a version")]
    NoMatch,
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Invalid hook name: {0}")]
    InvalidName(String),

    #[error("Hook script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to run hook {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Hook {} exited with {status}: {stderr}", path.display())]
    Failed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum AddError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
