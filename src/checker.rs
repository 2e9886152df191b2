//! Concurrent check run over the whole registry
//!
//! One future per registry entry is driven with `join_all`. Each future owns
//! the `&mut Library` for its own slot, so no entry can be touched by two
//! checks. Whether anything changed is derived from the collected outcomes
//! after the join, and the registry is persisted at most once per run.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::{FetchError, HookError, StorageError};
use crate::extractor::VersionSource;
use crate::hook::HookRunner;
use crate::library::Library;
use crate::notifier::Notifier;
use crate::store::RegistryStore;

/// A detected version change for one entry
#[derive(Debug)]
pub struct Update {
    pub previous: String,
    pub current: String,
    /// Hook result, if the entry has a hook configured
    pub hook_output: Option<Result<String, HookError>>,
}

/// Terminal state of one entry after a check
#[derive(Debug)]
pub enum EntryOutcome {
    /// Upstream version equals the stored one
    Unchanged,
    /// Stored version was replaced, notifier (and hook) fired
    Updated(Update),
    /// Fetch or extraction failed; the entry was left as it was
    Failed(FetchError),
}

impl EntryOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, EntryOutcome::Updated(_))
    }
}

/// Result of a full check run, in registry order
#[derive(Debug)]
pub struct CheckReport {
    pub outcomes: Vec<(String, EntryOutcome)>,
    /// Whether the registry was written back
    pub saved: bool,
}

impl CheckReport {
    pub fn updated(&self) -> impl Iterator<Item = (&str, &Update)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            EntryOutcome::Updated(update) => Some((name.as_str(), update)),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            EntryOutcome::Failed(e) => Some((name.as_str(), e)),
            _ => None,
        })
    }

    pub fn hook_failures(&self) -> impl Iterator<Item = (&str, &HookError)> {
        self.updated()
            .filter_map(|(name, update)| match &update.hook_output {
                Some(Err(e)) => Some((name, e)),
                _ => None,
            })
    }
}

/// Coordinates registry storage, version fetching, notification and hooks
pub struct Checker {
    store: Arc<dyn RegistryStore>,
    source: Arc<dyn VersionSource>,
    notifier: Arc<dyn Notifier>,
    hooks: Arc<dyn HookRunner>,
}

impl Checker {
    pub fn new(
        store: Arc<dyn RegistryStore>,
        source: Arc<dyn VersionSource>,
        notifier: Arc<dyn Notifier>,
        hooks: Arc<dyn HookRunner>,
    ) -> Self {
        Self {
            store,
            source,
            notifier,
            hooks,
        }
    }

    /// Checks every registry entry concurrently and persists changes.
    ///
    /// Per-entry fetch failures are reported in the returned [`CheckReport`];
    /// only storage failures abort the run.
    pub async fn run(&self) -> Result<CheckReport, StorageError> {
        let mut libraries = self.store.load()?;
        info!("Checking {} libraries", libraries.len());

        let checks = libraries
            .iter_mut()
            .map(|library| self.check_library(library));
        let outcomes = join_all(checks).await;

        let saved = outcomes.iter().any(EntryOutcome::is_updated);
        if saved {
            self.store.save(&libraries).inspect_err(|e| {
                error!("Failed to save registry: {}", e);
            })?;
            info!("Registry saved");
        } else {
            debug!("No library changed, registry left untouched");
        }

        let outcomes = libraries
            .into_iter()
            .map(|library| library.name)
            .zip(outcomes)
            .collect();

        Ok(CheckReport { outcomes, saved })
    }

    async fn check_library(&self, library: &mut Library) -> EntryOutcome {
        let current = match self.source.fetch_version(library).await {
            Ok(version) => version,
            Err(e) => {
                warn!("Skipping {}: {}", library.name, e);
                return EntryOutcome::Failed(e);
            }
        };

        if current == library.version {
            debug!("{} is up to date at {}", library.name, current);
            return EntryOutcome::Unchanged;
        }

        let previous = library.version.clone();
        info!("{} changed: {} -> {}", library.name, previous, current);
        self.notifier.notify(library, &previous, &current);
        library.set_version(&current);

        let hook_output = match library.hook.as_deref() {
            Some(hook) => {
                let result = self.hooks.run(hook, &current).await;
                if let Err(e) = &result {
                    error!("Hook {} failed for {}: {}", hook, library.name, e);
                }
                Some(result)
            }
            None => None,
        };

        EntryOutcome::Updated(Update {
            previous,
            current,
            hook_output,
        })
    }
}
