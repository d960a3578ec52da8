//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Notification/audio behavior for end-of-phase alerts
//! - UI hints (keep the screen awake, progress dots)
//! - Session driver settings (tick interval, default rest)
//!
//! Configuration is stored at `~/.config/setflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::store::data_dir;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_50")]
    pub volume: u32,
    /// Path to a custom alert sound file (optional).
    /// If set, this file is played instead of the default chime.
    #[serde(default)]
    pub custom_sound: Option<String>,
}

/// UI configuration.
///
/// `keep_screen_on` is a preference the host UI reads while a session is
/// running; it never feeds back into the session state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub keep_screen_on: bool,
    #[serde(default = "default_true")]
    pub show_progress_dots: bool,
}

/// Session driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How often the driver polls `tick()`, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Rest applied by the editor when adding an exercise without an
    /// explicit rest duration, in seconds.
    #[serde(default = "default_rest_secs")]
    pub default_rest_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/setflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}
fn default_tick_interval_ms() -> u64 {
    200
}
fn default_rest_secs() -> u64 {
    60
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
            custom_sound: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            keep_screen_on: true,
            show_progress_dots: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            default_rest_secs: default_rest_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notifications: NotificationsConfig::default(),
            ui: UiConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing out defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(match current {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a config value by dot-separated key, parsing `value` to the type
    /// of the existing field, and persist the result.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()
    }
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if key.is_empty() {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Null | serde_json::Value::String(_) => {
                    serde_json::Value::String(value.into())
                }
                _ => return Err(ConfigError::UnknownKey(key.to_string())),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Err(ConfigError::UnknownKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = Config::default();
        assert!(cfg.notifications.enabled);
        assert_eq!(cfg.session.tick_interval_ms, 200);
        assert_eq!(cfg.session.default_rest_secs, 60);
        assert!(cfg.ui.keep_screen_on);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(indoc! {r#"
            [notifications]
            enabled = false

            [session]
            tick_interval_ms = 500
        "#})
        .unwrap();
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.notifications.volume, 50);
        assert_eq!(cfg.session.tick_interval_ms, 500);
        assert!(cfg.ui.show_progress_dots);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.tick_interval_ms").as_deref(), Some("200"));
        assert_eq!(cfg.get("ui.keep_screen_on").as_deref(), Some("true"));
        assert_eq!(cfg.get("notifications.bogus"), None);
    }

    #[test]
    fn set_parses_to_the_existing_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_json_value_by_path(&mut json, "notifications.volume", "80").unwrap();
        set_json_value_by_path(&mut json, "ui.keep_screen_on", "false").unwrap();
        let cfg: Config = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.notifications.volume, 80);
        assert!(!cfg.ui.keep_screen_on);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(matches!(
            set_json_value_by_path(&mut json, "nope.nothing", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_json_value_by_path(&mut json, "notifications.volume", "loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
