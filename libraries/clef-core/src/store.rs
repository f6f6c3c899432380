//! Mode-keyed configuration lookup

use crate::error::Result;
use crate::prefs::Preferences;
use crate::route::RouteMode;
use crate::settings::ChainSettings;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Default configuration namespace
pub const DEFAULT_NAMESPACE: &str = "clef";

/// Source of per-route effect configurations
///
/// Lookup is total: a route with nothing stored resolves to
/// [`ChainSettings::default()`], which leaves every effect off.
pub trait ConfigStore: Send + Sync {
    /// Resolve the settings stored for one route
    fn load(&self, mode: RouteMode) -> ChainSettings;
}

/// In-memory configuration store
///
/// Profiles are named `"<namespace>.<route>"`, for example `"clef.speaker"`.
/// The store is editable in place behind a shared reference; after editing,
/// announce the change through the manager's preference event so live
/// sessions pick it up.
pub struct MemoryConfigStore {
    namespace: String,
    profiles: Mutex<HashMap<String, Preferences>>,
}

impl MemoryConfigStore {
    /// Create an empty store with the default namespace
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    /// Create an empty store with a custom namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            profiles: Mutex::new(HashMap::new()),
        }
    }

    /// Load a store from a JSON bundle
    ///
    /// The bundle is an object keyed by route name:
    ///
    /// ```json
    /// {
    ///     "speaker": { "dsp.bass.enable": true, "dsp.bass.mode": "600" },
    ///     "headset": { "dsp.tone.enable": true, "dsp.tone.eq.custom": "2;1;0;1;2" }
    /// }
    /// ```
    ///
    /// # Errors
    /// Returns `Parse` when the bundle is not valid JSON of this shape
    pub fn from_json(namespace: impl Into<String>, json: &str) -> Result<Self> {
        let bundle: HashMap<String, Preferences> = serde_json::from_str(json)?;
        let store = Self::with_namespace(namespace);
        {
            let mut profiles = store.profiles.lock().unwrap();
            for (route, prefs) in bundle {
                profiles.insert(format!("{}.{}", store.namespace, route), prefs);
            }
        }
        Ok(store)
    }

    /// Load a store from a JSON bundle on disk
    ///
    /// # Errors
    /// Returns `Io` when the file cannot be read, `Parse` when its content
    /// is malformed
    pub fn from_json_file(namespace: impl Into<String>, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(namespace, &json)
    }

    /// Store or replace the profile for one route
    pub fn set_profile(&self, mode: RouteMode, prefs: Preferences) {
        let name = self.profile_name(mode);
        self.profiles.lock().unwrap().insert(name, prefs);
    }

    /// Remove the profile for one route
    pub fn clear_profile(&self, mode: RouteMode) {
        let name = self.profile_name(mode);
        self.profiles.lock().unwrap().remove(&name);
    }

    fn profile_name(&self, mode: RouteMode) -> String {
        format!("{}.{}", self.namespace, mode.as_str())
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self, mode: RouteMode) -> ChainSettings {
        let name = self.profile_name(mode);
        let profiles = self.profiles.lock().unwrap();
        match profiles.get(&name) {
            Some(prefs) => {
                debug!("Loaded configuration {} with {} values", name, prefs.len());
                ChainSettings::from_preferences(prefs)
            }
            None => {
                debug!("No configuration named {}, using defaults", name);
                ChainSettings::default()
            }
        }
    }
}
