use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

/// Durable key-value storage for the simulation state.
///
/// Implementations are best-effort: a failed read surfaces as `None` and a
/// failed write is logged and dropped. Callers never see storage errors.
pub trait SimulationStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
}

/// File-backed store: one flat JSON object of string keys and values,
/// rewritten on every save (last writer wins).
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "State file {} is corrupt ({}), starting with defaults",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Failed to read state file {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path,
            cache: Mutex::new(cache),
        }
    }

    fn flush(&self, cache: &HashMap<String, String>) {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    warn!("Failed to create state directory {}: {}", dir.display(), e);
                    return;
                }
            }
        }

        let raw = match serde_json::to_string_pretty(cache) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize state: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, raw) {
            warn!("Failed to write state file {}: {}", self.path.display(), e);
        }
    }
}

impl SimulationStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.cache.lock().unwrap().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        let mut cache = self.cache.lock().unwrap();
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache);
    }
}

/// In-memory store for tests and `--ephemeral` runs.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimulationStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("samodelkin-store-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn file_store_round_trip() {
        let path = temp_path("round-trip");
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::open(&path);
            store.save("admin_simulation_total_fake", "207");
            store.save("admin_simulation_online_active", "true");
        }

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.load("admin_simulation_total_fake").as_deref(),
            Some("207")
        );
        assert_eq!(
            reopened.load("admin_simulation_online_active").as_deref(),
            Some("true")
        );
        assert_eq!(reopened.load("missing_key"), None);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path);
        assert_eq!(store.load("admin_simulation_total_fake"), None);
    }

    #[test]
    fn file_store_corrupt_file_is_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.load("admin_simulation_total_fake"), None);

        // Writes still work after a corrupt read
        store.save("admin_simulation_total_fake", "42");
        assert_eq!(
            store.load("admin_simulation_total_fake").as_deref(),
            Some("42")
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load("k"), None);
        store.save("k", "v");
        assert_eq!(store.load("k").as_deref(), Some("v"));
    }
}
