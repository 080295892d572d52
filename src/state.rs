use crate::utils;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Storage key for the persisted expand state
const EXPANDED_KEY: &str = "expanded_folders";

/// One JSON object in one file, with get/set that never fail.
///
/// Read problems yield `None`/defaults, write problems are dropped after a
/// debug log. The worst outcome is that a preference does not survive a
/// restart.
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the default location (`<config dir>/state.json`)
    pub fn open_default() -> Self {
        Self::new(utils::get_config_dir().join("state.json"))
    }

    fn read_all(&self) -> serde_json::Map<String, Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("State file {:?} not readable: {}", self.path, e);
                return serde_json::Map::new();
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::debug!("State file {:?} is not a JSON object, ignoring", self.path);
                serde_json::Map::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    pub fn set(&self, key: &str, value: Value) {
        let mut all = self.read_all();
        all.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string(&Value::Object(all)) {
            Ok(text) => {
                if let Err(e) = fs::write(&self.path, text) {
                    log::debug!("Failed to write state file {:?}: {}", self.path, e);
                }
            }
            Err(e) => log::debug!("Failed to serialize state: {}", e),
        }
    }
}

/// Mutable UI state for one session.
///
/// The expanded set is loaded once at startup and written back after every
/// mutation. The selection lives only in memory and resets each run.
pub struct SessionState {
    pub expanded: HashSet<String>,
    pub selected: Option<String>,
    store: KvStore,
}

impl SessionState {
    pub fn load(store: KvStore) -> Self {
        let expanded = match store.get(EXPANDED_KEY) {
            Some(Value::Array(ids)) => ids
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => HashSet::new(),
        };
        Self {
            expanded,
            selected: None,
            store,
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip one folder's expand state; returns whether it is now expanded
    pub fn toggle_folder(&mut self, id: &str) -> bool {
        let now_expanded = if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        };
        self.persist();
        now_expanded
    }

    /// Make `id` the export root, replacing any previous choice
    pub fn select_folder(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    /// Expand exactly the given folders (callers pass every folder id in the
    /// rendered tree)
    pub fn expand_all(&mut self, all_folders: HashSet<String>) {
        self.expanded = all_folders;
        self.persist();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.persist();
    }

    fn persist(&self) {
        let mut ids: Vec<&str> = self.expanded.iter().map(String::as_str).collect();
        ids.sort_unstable();
        self.store.set(EXPANDED_KEY, serde_json::json!(ids));
    }
}
