//! Durable key/value preferences.
//!
//! All client-side state goes through [`PreferenceStore`]; nothing else touches the
//! backing storage. Values are plain strings or JSON-encoded string lists, and there is
//! no schema version. Multi-key updates are a plain sequence of `set` calls and are not
//! atomic.

use log::{debug, warn};
use std::collections::HashMap;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::error::PrefsError;

// Storage keys. These strings are a persisted contract and must not change.
pub const USER_NAME: &str = "userName";
pub const USER_PFP: &str = "userPfp";
pub const FAVORITE_CATEGORY: &str = "favoriteCategory";
pub const FAVORITE_AREA: &str = "favoriteArea";
pub const AVAILABLE_CATEGORIES: &str = "availableCategories";
pub const AVAILABLE_AREAS: &str = "availableAreas";
pub const SELECTED_CATEGORIES: &str = "selectedCategories";
pub const SELECTED_AREAS: &str = "selectedAreas";
pub const ONBOARDING_COMPLETE: &str = "onboardingComplete";
pub const IS_MOBILE: &str = "isMobile";

/// Keys holding the active search filters.
pub const FILTER_KEYS: [&str; 2] = [SELECTED_CATEGORIES, SELECTED_AREAS];

/// Emitted whenever a key is written or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
}

impl StorageEvent {
    pub fn touches_filters(&self) -> bool {
        FILTER_KEYS.contains(&self.key.as_str())
    }
}

/// Synchronous key/value persistence.
///
/// `get` never fails: an absent key is the normal first-run state. Writers report
/// failures so callers can log them; readers of typed values fall back to defaults
/// when a stored value is malformed.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrites unconditionally.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;

    /// Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;

    /// Receives a [`StorageEvent`] for every subsequent write or removal.
    fn subscribe(&mut self) -> Receiver<StorageEvent>;

    fn clear(&mut self, keys: &[&str]) -> Result<(), PrefsError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }

    /// Reads a JSON string list. Absent or malformed values read as empty.
    fn get_list(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.get(key) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed list under {key}: {e}");
            Vec::new()
        })
    }

    fn set_list(&mut self, key: &str, values: &[String]) -> Result<(), PrefsError> {
        let json = serde_json::to_string(values)?;
        self.set(key, &json)
    }

    /// Reads a `"true"`/`"false"` string. Anything else reads as absent.
    fn get_flag(&self, key: &str) -> Option<bool> {
        match self.get(key).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                warn!("Ignoring malformed flag under {key}: {other:?}");
                None
            }
            None => None,
        }
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.set(key, if value { "true" } else { "false" })
    }

    /// Like `get`, but an empty string reads as absent.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

#[derive(Default)]
struct Listeners(Vec<Sender<StorageEvent>>);

impl Listeners {
    fn subscribe(&mut self) -> Receiver<StorageEvent> {
        let (tx, rx) = channel();
        self.0.push(tx);
        rx
    }

    fn notify(&mut self, key: &str) {
        // Dropped receivers are pruned here.
        self.0.retain(|tx| {
            tx.send(StorageEvent {
                key: key.to_string(),
            })
            .is_ok()
        });
    }
}

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.listeners.notify(key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.entries.remove(key).is_some() {
            self.listeners.notify(key);
        }
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<StorageEvent> {
        self.listeners.subscribe()
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is held in memory and written through on every change. Each write
/// first merges in what other handles have written since, so a write only ever replaces
/// its own key. Reads see other handles' writes after [`FileStore::reload`].
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
    listeners: Listeners,
}

impl FileStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is logged and
    /// also treated as empty; it is overwritten on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent)?;
            }
        }

        let entries = Self::read_entries(&path).unwrap_or_default();

        Ok(Self {
            path,
            entries,
            listeners: Listeners::default(),
        })
    }

    /// Picks up writes made through other handles on the same file. Listeners hear about
    /// every key whose value changed. An unreadable file leaves the current map alone.
    pub fn reload(&mut self) {
        let Some(on_disk) = Self::read_entries(&self.path) else {
            return;
        };

        let mut changed: Vec<String> = on_disk
            .iter()
            .filter(|(key, value)| self.entries.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        changed.extend(
            self.entries
                .keys()
                .filter(|key| !on_disk.contains_key(*key))
                .cloned(),
        );

        self.entries = on_disk;
        for key in changed {
            debug!("{key} changed on disk");
            self.listeners.notify(&key);
        }
    }

    /// `None` when the file exists but cannot be read or parsed.
    fn read_entries(path: &Path) -> Option<HashMap<String, String>> {
        if !path.exists() {
            debug!("No preference file at {}, starting empty", path.display());
            return Some(HashMap::new());
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read preferences from {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!("Failed to parse preferences in {}: {e}", path.display());
                None
            }
        }
    }

    fn persist(&self) -> Result<(), PrefsError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.reload();
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()?;
        self.listeners.notify(key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.reload();
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist()?;
        self.listeners.notify(key);
        Ok(())
    }

    fn subscribe(&mut self) -> Receiver<StorageEvent> {
        self.listeners.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_key_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get(USER_NAME), None);
        assert!(store.get_list(SELECTED_CATEGORIES).is_empty());
        assert_eq!(store.get_flag(ONBOARDING_COMPLETE), None);
    }

    #[test]
    fn set_overwrites_and_remove_is_idempotent() {
        let mut store = MemoryStore::new();
        store.set(USER_NAME, "Ada").unwrap();
        store.set(USER_NAME, "Grace").unwrap();
        assert_eq!(store.get(USER_NAME).as_deref(), Some("Grace"));

        store.remove(USER_NAME).unwrap();
        store.remove(USER_NAME).unwrap();
        assert_eq!(store.get(USER_NAME), None);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(SELECTED_AREAS, "not json").unwrap();
        store.set(IS_MOBILE, "maybe").unwrap();

        assert!(store.get_list(SELECTED_AREAS).is_empty());
        assert_eq!(store.get_flag(IS_MOBILE), None);
    }

    #[test]
    fn lists_are_stored_as_json_arrays() {
        let mut store = MemoryStore::new();
        let values = vec!["Vegan".to_string(), "Seafood".to_string()];
        store.set_list(SELECTED_CATEGORIES, &values).unwrap();

        assert_eq!(
            store.get(SELECTED_CATEGORIES).as_deref(),
            Some(r#"["Vegan","Seafood"]"#)
        );
        assert_eq!(store.get_list(SELECTED_CATEGORIES), values);
    }

    #[test]
    fn subscribers_see_writes_and_removals() {
        let mut store = MemoryStore::new();
        let events = store.subscribe();

        store.set(SELECTED_CATEGORIES, "[]").unwrap();
        store.remove(SELECTED_CATEGORIES).unwrap();
        // absent key: no event
        store.remove(SELECTED_AREAS).unwrap();

        let keys: Vec<String> = events.try_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![SELECTED_CATEGORIES, SELECTED_CATEGORIES]);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        {
            let mut store = FileStore::open(&path).unwrap();
            store.set(USER_NAME, "Ada").unwrap();
            store.set_flag(ONBOARDING_COMPLETE, true).unwrap();
            store
                .set_list(SELECTED_AREAS, &["Thai".to_string()])
                .unwrap();
            store.remove(USER_NAME).unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(USER_NAME), None);
        assert_eq!(store.get_flag(ONBOARDING_COMPLETE), Some(true));
        assert_eq!(store.get_list(SELECTED_AREAS), vec!["Thai".to_string()]);
    }

    #[test]
    fn handles_on_one_file_keep_each_others_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut first = FileStore::open(&path).unwrap();
        let mut second = FileStore::open(&path).unwrap();
        let events = second.subscribe();

        first
            .set_list(SELECTED_CATEGORIES, &["Vegan".to_string()])
            .unwrap();
        second.set(USER_NAME, "Ada").unwrap();

        let keys: Vec<String> = events.try_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![SELECTED_CATEGORIES, USER_NAME]);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_list(SELECTED_CATEGORIES), vec!["Vegan".to_string()]);
        assert_eq!(reopened.get(USER_NAME).as_deref(), Some("Ada"));
    }

    #[test]
    fn reload_reports_outside_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut first = FileStore::open(&path).unwrap();
        first.set(USER_NAME, "Ada").unwrap();
        first.set(FAVORITE_AREA, "Thai").unwrap();

        let mut second = FileStore::open(&path).unwrap();
        let events = second.subscribe();

        first.set(USER_NAME, "Grace").unwrap();
        first.remove(FAVORITE_AREA).unwrap();
        assert_eq!(second.get(USER_NAME).as_deref(), Some("Ada"));

        second.reload();
        assert_eq!(second.get(USER_NAME).as_deref(), Some("Grace"));
        assert_eq!(second.get(FAVORITE_AREA), None);

        let mut keys: Vec<String> = events.try_iter().map(|e| e.key).collect();
        keys.sort();
        assert_eq!(keys, vec![FAVORITE_AREA, USER_NAME]);

        // nothing new on disk, nothing to report
        second.reload();
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn unreadable_file_on_reload_keeps_memory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set(USER_NAME, "Ada").unwrap();
        fs::write(&path, "{ not json").unwrap();

        store.reload();
        assert_eq!(store.get(USER_NAME).as_deref(), Some("Ada"));
    }

    #[test]
    fn corrupt_file_opens_empty_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(USER_NAME), None);

        store.set(USER_NAME, "Ada").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(USER_NAME).as_deref(), Some("Ada"));
    }
}
