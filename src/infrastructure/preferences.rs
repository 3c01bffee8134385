//! Injected persistence for UI preference scalars

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::shared::errors::PreferenceError;
use crate::shared::types::{Theme, UiPreferences, ViewMode};

pub const KEY_SLIPPAGE: &str = "swap-slippage";
pub const KEY_VIEW_MODE: &str = "swap-view-mode";
pub const KEY_THEME: &str = "swap-theme";
pub const KEY_HIDE_IP: &str = "swap-hide-ip";

/// Get/set-by-key persistence seam. The core writes preferences only
/// through this interface, never through ambient storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Volatile store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file-backed store; the whole map is rewritten on every set
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| PreferenceError::ReadFailed(e.to_string()))?;
            serde_json::from_str(&raw)
                .map_err(|e| PreferenceError::CorruptData(e.to_string()))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), PreferenceError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| PreferenceError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| PreferenceError::WriteFailed(e.to_string()))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }
}

/// Typed accessors over a preference store
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Saved slippage, if a valid value was ever persisted
    pub fn slippage_pct(&self) -> Option<f64> {
        self.store
            .get(KEY_SLIPPAGE)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn set_slippage_pct(&self, pct: f64) -> Result<(), PreferenceError> {
        self.store.set(KEY_SLIPPAGE, &pct.to_string())
    }

    pub fn theme(&self) -> Option<Theme> {
        match self.store.get(KEY_THEME).as_deref() {
            Some("light") => Some(Theme::Light),
            Some("dark") => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let raw = match theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        self.store.set(KEY_THEME, raw)
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        match self.store.get(KEY_VIEW_MODE).as_deref() {
            Some("simple") => Some(ViewMode::Simple),
            Some("advanced") => Some(ViewMode::Advanced),
            _ => None,
        }
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> Result<(), PreferenceError> {
        let raw = match mode {
            ViewMode::Simple => "simple",
            ViewMode::Advanced => "advanced",
        };
        self.store.set(KEY_VIEW_MODE, raw)
    }

    pub fn hide_ip(&self) -> Option<bool> {
        match self.store.get(KEY_HIDE_IP).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    pub fn set_hide_ip(&self, hide: bool) -> Result<(), PreferenceError> {
        self.store.set(KEY_HIDE_IP, if hide { "true" } else { "false" })
    }

    /// Assemble the full preference set, falling back to defaults for
    /// missing or unparseable entries
    pub fn load(&self) -> UiPreferences {
        let defaults = UiPreferences::default();
        UiPreferences {
            slippage_pct: self.slippage_pct().unwrap_or(defaults.slippage_pct),
            theme: self.theme().unwrap_or(defaults.theme),
            view_mode: self.view_mode().unwrap_or(defaults.view_mode),
            hide_ip: self.hide_ip().unwrap_or(defaults.hide_ip),
        }
    }

    /// Persist the full preference set
    pub fn save(&self, prefs: &UiPreferences) {
        for result in [
            self.set_slippage_pct(prefs.slippage_pct),
            self.set_theme(prefs.theme),
            self.set_view_mode(prefs.view_mode),
            self.set_hide_ip(prefs.hide_ip),
        ] {
            if let Err(e) = result {
                warn!("failed to persist preference: {}", e);
            }
        }
    }
}
