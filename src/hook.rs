//! Post-update hook scripts

use std::path::{Component, Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::HookError;

/// Trait for running the hook attached to a library after its version changed
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HookRunner: Send + Sync {
    /// Runs `hook` with `version` as its only argument and returns its stdout
    async fn run(&self, hook: &str, version: &str) -> Result<String, HookError>;
}

/// Runs executables found in a hooks directory
pub struct ScriptHookRunner {
    hooks_dir: PathBuf,
}

impl ScriptHookRunner {
    pub fn new(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
        }
    }

    /// Resolves a hook name to a script path inside the hooks directory.
    /// Only a single plain file name is accepted.
    pub fn script_path(&self, hook: &str) -> Result<PathBuf, HookError> {
        let mut components = Path::new(hook).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.hooks_dir.join(name)),
            _ => Err(HookError::InvalidName(hook.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl HookRunner for ScriptHookRunner {
    async fn run(&self, hook: &str, version: &str) -> Result<String, HookError> {
        let path = self.script_path(hook)?;
        if !path.is_file() {
            return Err(HookError::NotFound(path));
        }

        debug!("Running hook {} with {}", path.display(), version);
        let output = Command::new(&path)
            .arg(version)
            .output()
            .await
            .map_err(|source| HookError::Spawn {
                path: path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HookError::Failed {
                path,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Hook {} finished for version {}", hook, version);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
