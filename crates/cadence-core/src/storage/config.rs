//! TOML persistence for planner coefficients.
//!
//! The config lives at `<data dir>/config.toml`. Coefficients are addressed
//! by their field name (`quantum_min`, `fatigue_force_break`, ...). The
//! `feedback` history is stored in the same file but can only change through
//! [`PlannerConfig::record_feedback`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::data_dir;
use crate::config::PlannerConfig;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILE: &str = "config.toml";

/// Keys that `set` refuses.
const READ_ONLY_KEYS: &[&str] = &["feedback"];

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    root.as_object()?.get(key)
}

/// Replace numeric `key` in `root`, keeping integers integral.
fn assign(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let obj = root
        .as_object_mut()
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    let existing = obj
        .get(key)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let new_value = match existing {
        Value::Number(_) => {
            let trimmed = value.trim();
            if let Ok(n) = trimmed.parse::<u64>() {
                Value::Number(n.into())
            } else if let Ok(n) = trimmed.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| ConfigError::invalid(key, format!("'{value}' is not finite")))?
            } else {
                return Err(ConfigError::invalid(key, format!("cannot parse '{value}' as number")));
            }
        }
        _ => return Err(ConfigError::invalid(key, "not a scalar coefficient")),
    };

    obj.insert(key.to_string(), new_value);
    Ok(())
}

impl PlannerConfig {
    /// `<data dir>/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or holds
    /// invalid coefficients, or if the defaults cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// See [`PlannerConfig::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: PlannerConfig =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                debug!(path = %path.display(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                debug!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "using default config");
            Self::default()
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path, creating parent directories.
    ///
    /// # Errors
    ///
    /// See [`PlannerConfig::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let save_failed = |e: std::io::Error| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }
        std::fs::write(path, content).map_err(save_failed)?;
        Ok(())
    }

    /// Current value of a coefficient as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match lookup(&json, key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Change a coefficient in memory. The value is parsed as the type of
    /// the current value and the result must pass [`PlannerConfig::validate`];
    /// on error `self` is left unchanged. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for unknown or read-only keys and
    /// [`ConfigError::InvalidValue`] for unparsable or out-of-range values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if READ_ONLY_KEYS.contains(&key) {
            return Err(ConfigError::UnknownKey(format!("{key} (read-only)")).into());
        }
        let mut json = serde_json::to_value(&*self)?;
        assign(&mut json, key, value)?;
        let next: PlannerConfig = serde_json::from_value(json)
            .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// All settable coefficients with their current values, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let Ok(Value::Object(map)) = serde_json::to_value(self) else {
            return Vec::new();
        };
        map.into_iter()
            .filter(|(key, _)| !READ_ONLY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }
}
