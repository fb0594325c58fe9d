//! Saved-script persistence.
//!
//! The core evaluator never depends on how scripts are stored — it only
//! sees the [`ScriptStore`] trait. [`JsonFileStore`] is the ambient
//! implementation this crate ships: the whole `name → source` map as one
//! JSON document under the OS config directory, the same
//! "small state file under `dirs::config_dir()`" technique the teacher's
//! daemon state used for `current.txt`/`daemon.pid`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{BotScriptError, Result};

/// Opaque key → text store for saved scripts.
pub trait ScriptStore {
    fn save(&mut self, name: &str, source: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<String>;
    fn list(&self) -> Result<Vec<String>>;
}

/// Returns `true` when `name` matches `[A-Za-z0-9_-]{1,64}` (§6, §8 P10).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A [`ScriptStore`] backed by a single JSON file under the OS config
/// directory (`~/.config/botscript/scripts.json` on Linux, the platform
/// equivalent elsewhere via `dirs::config_dir()`).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the default store location, creating the config directory if
    /// it doesn't exist yet. Does not create the JSON file itself until
    /// the first `save`.
    pub fn open_default() -> Result<Self> {
        let mut dir = dirs::config_dir()
            .ok_or_else(|| BotScriptError::IOError("could not find a config directory".to_string()))?;
        dir.push("botscript");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self {
            path: dir.join("scripts.json"),
        })
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, scripts: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(scripts)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ScriptStore for JsonFileStore {
    fn save(&mut self, name: &str, source: &str) -> Result<()> {
        if !is_valid_name(name) {
            return Err(BotScriptError::RuntimeError(format!(
                "invalid script name '{}': expected 1-64 characters of [A-Za-z0-9_-]",
                name
            )));
        }
        let mut scripts = self.read_all()?;
        scripts.insert(name.to_string(), source.to_string());
        self.write_all(&scripts)
    }

    fn load(&self, name: &str) -> Result<String> {
        let scripts = self.read_all()?;
        scripts
            .get(name)
            .cloned()
            .ok_or_else(|| BotScriptError::RuntimeError(format!("no saved script named '{}'", name)))
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> JsonFileStore {
        let mut path = std::env::temp_dir();
        path.push(format!("botscript-test-{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        JsonFileStore::at_path(path)
    }

    #[test]
    fn save_then_list_then_load_round_trips() {
        let mut store = temp_store("round-trip");
        store.save("greeter", "say \"hi\"").unwrap();
        assert_eq!(store.list().unwrap(), vec!["greeter".to_string()]);
        assert_eq!(store.load("greeter").unwrap(), "say \"hi\"");
    }

    #[test]
    fn save_rejects_invalid_names_without_touching_the_store() {
        let mut store = temp_store("invalid-name");
        let err = store.save("bad name!", "say \"hi\"").unwrap_err();
        assert_eq!(err.kind(), "runtime_error");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn loading_an_unknown_name_errors() {
        let store = temp_store("unknown");
        assert!(store.load("nope").is_err());
    }
}
