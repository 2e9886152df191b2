//! JSON-file backed registry storage

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::StorageError;
use crate::library::Library;

/// Trait for loading and persisting the registry
#[cfg_attr(test, automock)]
pub trait RegistryStore: Send + Sync {
    /// Reads every entry, in file order
    fn load(&self) -> Result<Vec<Library>, StorageError>;

    /// Replaces the stored registry with `libraries`
    fn save(&self, libraries: &[Library]) -> Result<(), StorageError>;

    /// Like [`RegistryStore::load`], but a missing registry is an empty one
    fn load_or_empty(&self) -> Result<Vec<Library>, StorageError> {
        match self.load() {
            Err(StorageError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }
}

/// Registry kept as a single indented JSON array on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Renders entries as a JSON array indented with four spaces
pub fn render(libraries: &[Library]) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    libraries
        .serialize(&mut serializer)
        .map_err(StorageError::Serialize)?;
    Ok(buf)
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Library>, StorageError> {
        let raw = fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(self.path.clone()),
            _ => self.io_error(e),
        })?;

        let libraries: Vec<Library> =
            serde_json::from_slice(&raw).map_err(|source| StorageError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "Loaded {} libraries from {}",
            libraries.len(),
            self.path.display()
        );
        Ok(libraries)
    }

    fn save(&self, libraries: &[Library]) -> Result<(), StorageError> {
        let bytes = render(libraries)?;

        // Symlinked registries are replaced at their real location
        let target = match fs::canonicalize(&self.path) {
            Ok(target) => target,
            Err(e) if e.kind() == ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(self.io_error(e)),
        };
        let previous_permissions = fs::metadata(&target).ok().map(|m| m.permissions());

        // Write beside the target, then rename over it
        let mut temp_name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "registry.json".into());
        temp_name.push(format!(".{}.tmp", std::process::id()));
        let temp_path = target.with_file_name(temp_name);

        fs::write(&temp_path, &bytes).map_err(|e| self.io_error(e))?;
        let replaced = match previous_permissions {
            Some(permissions) => fs::set_permissions(&temp_path, permissions),
            None => Ok(()),
        }
        .and_then(|()| fs::rename(&temp_path, &target));
        if let Err(e) = replaced {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(e));
        }

        debug!(
            "Saved {} libraries to {}",
            libraries.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, JsonFileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("registry.json"));
        (temp_dir, store)
    }

    fn sample_libraries() -> Vec<Library> {
        vec![
            Library::new(
                "prometheus",
                "1.6.2",
                "https://example.com/prometheus",
                r"v(?P<Version>[0-9.]+)",
                Some("deploy.sh"),
            ),
            Library::new(
                "demo",
                "1.0.0",
                "https://example.com/demo",
                r"Version: (?P<Version>[0-9.]+)",
                None,
            ),
        ]
    }

    #[test]
    fn save_then_load_preserves_entries_and_order() {
        let (_temp_dir, store) = create_test_store();
        let libraries = sample_libraries();

        store.save(&libraries).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, libraries);
    }

    #[test]
    fn save_writes_four_space_indented_array() {
        let (_temp_dir, store) = create_test_store();
        let libraries = vec![Library::new("demo", "1.0.0", "http://x", "r", None)];

        store.save(&libraries).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();

        assert_eq!(
            content,
            "[\n    {\n        \"name\": \"demo\",\n        \"version\": \"1.0.0\",\n        \"url\": \"http://x\",\n        \"regex\": \"r\"\n    }\n]"
        );
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let (temp_dir, store) = create_test_store();

        store.save(&sample_libraries()).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["registry.json"]);
    }

    #[test]
    fn load_returns_not_found_for_missing_file() {
        let (_temp_dir, store) = create_test_store();

        let result = store.load();

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn load_or_empty_returns_empty_for_missing_file() {
        let (_temp_dir, store) = create_test_store();

        assert!(store.load_or_empty().unwrap().is_empty());
    }

    #[test]
    fn load_returns_malformed_for_invalid_json() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "{not json").unwrap();

        let result = store.load();

        assert!(matches!(result, Err(StorageError::Malformed { .. })));
    }

    #[test]
    fn load_or_empty_propagates_malformed_file() {
        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), r#"{"name": "not an array"}"#).unwrap();

        assert!(matches!(
            store.load_or_empty(),
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn load_accepts_registry_with_empty_hook_strings() {
        let (_temp_dir, store) = create_test_store();
        fs::write(
            store.path(),
            r#"[{"name": "demo", "version": "1.0", "url": "http://x", "regex": "r", "hook": ""}]"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();

        assert_eq!(
            loaded,
            vec![Library::new("demo", "1.0", "http://x", "r", None)]
        );
    }

    #[test]
    fn save_reports_io_error_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("absent/registry.json"));

        let result = store.save(&sample_libraries());

        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn save_writes_through_symlinked_registry() {
        let temp_dir = TempDir::new().unwrap();
        let real_path = temp_dir.path().join("real.json");
        let link_path = temp_dir.path().join("registry.json");
        fs::write(&real_path, "[]").unwrap();
        std::os::unix::fs::symlink(&real_path, &link_path).unwrap();
        let store = JsonFileStore::new(&link_path);

        store.save(&sample_libraries()).unwrap();

        assert!(
            fs::symlink_metadata(&link_path)
                .unwrap()
                .file_type()
                .is_symlink()
        );
        assert_eq!(
            JsonFileStore::new(&real_path).load().unwrap(),
            sample_libraries()
        );
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp_dir, store) = create_test_store();
        fs::write(store.path(), "[]").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o600)).unwrap();

        store.save(&sample_libraries()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
