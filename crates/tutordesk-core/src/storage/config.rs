//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reminder behavior (lookahead window, system notifications)
//! - Automatic backup cadence and target directory
//! - Tutor profile shown on exported documents
//! - Presentation preferences persisted for the desktop shell
//!
//! Configuration is stored at `~/.config/tutordesk/config.toml`. Values
//! with a bounded range are clamped on load and on set, never rejected.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::notify::{clamp_offset, DEFAULT_OFFSET_MINUTES};

const MAX_AUTO_BACKUP_DAYS: u32 = 365;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 2.0;

/// Reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Forward notices to the OS notification center as well.
    #[serde(default = "default_true")]
    pub system_enabled: bool,
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: u32,
}

/// Automatic backup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Days between automatic backups; 0 disables them.
    #[serde(default)]
    pub auto_backup_days: u32,
    /// Target directory; the data directory when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

/// Tutor profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specialization: String,
}

/// Presentation preferences. The core only persists these; applying them
/// is the shell's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_zoom")]
    pub schedule_zoom: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tutordesk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_offset_minutes() -> u32 {
    DEFAULT_OFFSET_MINUTES
}
fn default_theme() -> String {
    "dark".into()
}
fn default_zoom() -> f64 {
    1.0
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            system_enabled: true,
            offset_minutes: DEFAULT_OFFSET_MINUTES,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            auto_backup_days: 0,
            dir: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            schedule_zoom: 1.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notifications: NotificationsConfig::default(),
            backup: BackupConfig::default(),
            profile: ProfileConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| format!("cannot parse '{value}' as number"))?
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    /// Pull every bounded value back into its supported range.
    pub(crate) fn normalize(&mut self) {
        self.notifications.offset_minutes = clamp_offset(self.notifications.offset_minutes);
        self.backup.auto_backup_days = self.backup.auto_backup_days.min(MAX_AUTO_BACKUP_DAYS);
        if !self.ui.schedule_zoom.is_finite() {
            self.ui.schedule_zoom = default_zoom();
        }
        self.ui.schedule_zoom = self.ui.schedule_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let mut cfg: Config = toml::from_str(&content)?;
                cfg.normalize();
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
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, clamp it, and save. Returns an error if
    /// the key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.normalize();
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
