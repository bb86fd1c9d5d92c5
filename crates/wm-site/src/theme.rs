//! Theme preference bootstrap.
//!
//! [`ensure_default`] persists the configured default theme the first time
//! a site is initialized and leaves any existing preference alone. The same
//! check runs in the browser through [`bootstrap_script`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use wm_config::Theme;

/// Error from a preference store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be read or written.
    #[error("Preference store unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    fn unavailable(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Key-value persistence for user preferences.
pub trait ThemeStore {
    /// Stored value for `key`, `None` when unset.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Persist `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by a JSON object file (e.g. `.waymark/preferences.json`).
///
/// A missing file reads as empty. Writing creates parent directories and
/// keeps unrelated keys.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::unavailable(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::unavailable(
                &self.path,
                "preference file is not a JSON object",
            )),
            Err(e) => Err(StoreError::unavailable(&self.path, e)),
        }
    }
}

impl ThemeStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(&self.path, e))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StoreError::unavailable(&self.path, e))?;
        fs::write(&self.path, content).map_err(|e| StoreError::unavailable(&self.path, e))
    }
}

/// Persist `default` under `key` unless a preference already exists.
///
/// Returns the effective theme, or `None` when it cannot be determined (the
/// store is unavailable or holds a value that is not a theme). Store errors
/// are logged and never propagated. An unrecognized stored value is left
/// untouched.
pub fn ensure_default<S: ThemeStore + ?Sized>(
    store: &mut S,
    key: &str,
    default: Theme,
) -> Option<Theme> {
    let stored = match store.get(key) {
        Ok(stored) => stored,
        Err(e) => {
            tracing::debug!(key, error = %e, "Theme store unavailable, skipping default");
            return None;
        }
    };

    if let Some(value) = stored {
        return match value.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(_) => {
                tracing::debug!(key, value = %value, "Stored theme not recognized, leaving as is");
                None
            }
        };
    }

    if let Err(e) = store.set(key, default.as_str()) {
        tracing::debug!(key, error = %e, "Failed to persist default theme");
    } else {
        tracing::info!(key, theme = %default, "Stored default theme");
    }
    Some(default)
}

/// Inline `<head>` script applying the same default in the browser.
///
/// Runs before first paint so the page never flashes the wrong theme.
#[must_use]
pub fn bootstrap_script(key: &str, default: Theme) -> String {
    let key = script_literal(&Value::from(key));
    let default = script_literal(&Value::from(default.as_str()));
    format!(
        "(function () {{\n\
         \x20 try {{\n\
         \x20   var key = {key};\n\
         \x20   var stored = localStorage.getItem(key);\n\
         \x20   if (stored === null) {{\n\
         \x20     localStorage.setItem(key, {default});\n\
         \x20     document.documentElement.dataset.theme = {default};\n\
         \x20   }}\n\
         \x20 }} catch (e) {{}}\n\
         }})();\n"
    )
}

/// JSON literal safe to embed in an inline `<script>` element.
fn script_literal(value: &Value) -> String {
    value.to_string().replace('<', "\\u003c")
}
