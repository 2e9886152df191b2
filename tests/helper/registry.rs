//! Registry test utilities

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use verdog::checker::Checker;
use verdog::extractor::HttpVersionSource;
use verdog::hook::ScriptHookRunner;
use verdog::library::Library;
use verdog::notifier::Notifier;
use verdog::store::{JsonFileStore, RegistryStore};

/// Notifier that records every call instead of printing
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, library: &Library, previous: &str, current: &str) {
        self.calls.lock().unwrap().push((
            library.name.clone(),
            previous.to_string(),
            current.to_string(),
        ));
    }
}

/// A temporary working directory holding a registry file and a hooks directory
pub struct TestWorkspace {
    pub dir: TempDir,
    pub store: Arc<JsonFileStore>,
}

impl TestWorkspace {
    pub fn new(libraries: &[Library]) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("hooks")).unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("registry.json")));
        store.save(libraries).unwrap();
        Self { dir, store }
    }

    pub fn registry_path(&self) -> &Path {
        self.store.path()
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.dir.path().join("hooks")
    }

    pub fn registry_bytes(&self) -> Vec<u8> {
        fs::read(self.registry_path()).unwrap()
    }

    pub fn libraries(&self) -> Vec<Library> {
        self.store.load().unwrap()
    }

    /// Checker wired to the real file store, HTTP source and hook runner
    pub fn checker(&self, notifier: Arc<RecordingNotifier>) -> Checker {
        Checker::new(
            self.store.clone(),
            Arc::new(HttpVersionSource::new(Duration::from_secs(5)).unwrap()),
            notifier,
            Arc::new(ScriptHookRunner::new(self.hooks_dir())),
        )
    }

    #[cfg(unix)]
    pub fn write_hook(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.hooks_dir().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

pub fn library(name: &str, version: &str, url: &str, regex: &str) -> Library {
    Library::new(name, version, url, regex, None)
}
