//! TOML-based application configuration.
//!
//! Stores planner preferences including:
//! - Scheduler tuning (lead time, capacity buffer)
//! - Default hour estimates per item kind
//! - The user the CLI acts for by default
//!
//! Configuration is stored at `~/.config/weekplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::item::catalog::KindCatalog;
use crate::scheduler::SchedulerConfig;
use crate::stats::DEFAULT_TIME_NEEDED_BUFFER;
use crate::week::DEFAULT_LEAD_TIME_DAYS;

/// Scheduler-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSection {
    #[serde(default = "default_lead_time_days")]
    pub lead_time_days: i64,
    #[serde(default = "default_capacity_buffer")]
    pub capacity_buffer: f64,
    #[serde(default = "default_time_needed_buffer")]
    pub time_needed_buffer: f64,
}

/// Default hours per item kind.
///
/// An absent estimate is written as `"none"` so that clearing a field
/// survives a save and reload instead of falling back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_essay_draft_hours", with = "optional_hours")]
    pub essay_draft_hours: Option<f64>,
    #[serde(default = "default_essay_final_hours", with = "optional_hours")]
    pub essay_final_hours: Option<f64>,
    #[serde(default = "default_timebox_hours", with = "optional_hours")]
    pub timebox_hours: Option<f64>,
    #[serde(default, with = "optional_hours")]
    pub notification_hours: Option<f64>,
}

/// Hours as a number, or the literal `"none"`.
mod optional_hours {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const NONE: &str = "none";

    /// Whether `raw` spells an absent estimate.
    pub fn is_none_literal(raw: &str) -> bool {
        matches!(raw, NONE | "null" | "")
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hours(f64),
        Label(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(hours) => s.serialize_f64(*hours),
            None => s.serialize_str(NONE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Repr>::deserialize(d)? {
            None => Ok(None),
            Some(Repr::Hours(hours)) => Ok(Some(hours)),
            Some(Repr::Label(label)) if is_none_literal(&label) => Ok(None),
            Some(Repr::Label(label)) => Err(de::Error::custom(format!(
                "expected hours or \"{NONE}\", got '{label}'"
            ))),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weekplan/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub catalog: CatalogSection,
}

/// Largest accepted `scheduler.lead_time_days`.
pub const MAX_LEAD_TIME_DAYS: i64 = 365;

// Default functions
fn default_lead_time_days() -> i64 {
    DEFAULT_LEAD_TIME_DAYS
}
fn default_capacity_buffer() -> f64 {
    1.1
}
fn default_time_needed_buffer() -> f64 {
    DEFAULT_TIME_NEEDED_BUFFER
}
fn default_essay_draft_hours() -> Option<f64> {
    Some(2.0)
}
fn default_essay_final_hours() -> Option<f64> {
    Some(1.0)
}
fn default_timebox_hours() -> Option<f64> {
    Some(2.0)
}
fn default_user() -> String {
    "local".into()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            lead_time_days: default_lead_time_days(),
            capacity_buffer: default_capacity_buffer(),
            time_needed_buffer: default_time_needed_buffer(),
        }
    }
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            essay_draft_hours: default_essay_draft_hours(),
            essay_final_hours: default_essay_final_hours(),
            timebox_hours: default_timebox_hours(),
            notification_hours: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: default_user(),
            scheduler: SchedulerSection::default(),
            catalog: CatalogSection::default(),
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

    fn parse_number(key: &str, value: &str) -> Result<serde_json::Value, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as number"),
        };
        if let Ok(n) = value.parse::<i64>() {
            Ok(serde_json::Value::Number(n.into()))
        } else if let Ok(n) = value.parse::<f64>() {
            serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .ok_or_else(invalid)
        } else {
            Err(invalid())
        }
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // Every catalog field is an optional estimate, whatever it holds now.
                if key.starts_with("catalog.") {
                    let new_value = if optional_hours::is_none_literal(value) {
                        serde_json::Value::String(optional_hours::NONE.into())
                    } else {
                        Self::parse_number(key, value)?
                    };
                    obj.insert(part.to_string(), new_value);
                    return Ok(());
                }

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        serde_json::Value::Bool(value.parse::<bool>().map_err(|e| {
                            ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: e.to_string(),
                            }
                        })?)
                    }
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        Self::parse_number(key, value)?
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: "cannot set a whole section".to_string(),
                        });
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let mut json = serde_json::to_value(&*self).map_err(invalid)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(invalid)?;
        updated.check()?;
        *self = updated;
        Ok(())
    }

    /// Reject values the engine cannot work with.
    fn check(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        if !(0..=MAX_LEAD_TIME_DAYS).contains(&self.scheduler.lead_time_days) {
            return Err(invalid(
                "scheduler.lead_time_days",
                &format!("must be between 0 and {MAX_LEAD_TIME_DAYS}"),
            ));
        }
        if !(self.scheduler.capacity_buffer > 0.0) {
            return Err(invalid("scheduler.capacity_buffer", "must be positive"));
        }
        if !(self.scheduler.time_needed_buffer > 0.0) {
            return Err(invalid("scheduler.time_needed_buffer", "must be positive"));
        }
        let catalog = [
            ("catalog.essay_draft_hours", self.catalog.essay_draft_hours),
            ("catalog.essay_final_hours", self.catalog.essay_final_hours),
            ("catalog.timebox_hours", self.catalog.timebox_hours),
            ("catalog.notification_hours", self.catalog.notification_hours),
        ];
        for (key, hours) in catalog {
            if hours.is_some_and(|h| h < 0.0) {
                return Err(invalid(key, "must not be negative"));
            }
        }
        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            lead_time_days: self.scheduler.lead_time_days,
            capacity_buffer: self.scheduler.capacity_buffer,
        }
    }

    pub fn catalog(&self) -> KindCatalog {
        KindCatalog::new(
            self.catalog.essay_draft_hours,
            self.catalog.essay_final_hours,
            self.catalog.timebox_hours,
            self.catalog.notification_hours,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.catalog.notification_hours, None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[scheduler]\nlead_time_days = 3\n").unwrap();
        assert_eq!(parsed.scheduler.lead_time_days, 3);
        assert_eq!(parsed.scheduler.capacity_buffer, 1.1);
        assert_eq!(parsed.catalog.essay_draft_hours, Some(2.0));
        assert_eq!(parsed.default_user, "local");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("scheduler.lead_time_days").as_deref(), Some("2"));
        assert_eq!(cfg.get("catalog.notification_hours").as_deref(), Some("none"));
        assert_eq!(cfg.get("default_user").as_deref(), Some("local"));
        assert!(cfg.get("scheduler.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("scheduler.capacity_buffer", "1.25").unwrap();
        assert_eq!(cfg.scheduler.capacity_buffer, 1.25);
        cfg.set("scheduler.lead_time_days", "3").unwrap();
        assert_eq!(cfg.scheduler.lead_time_days, 3);
    }

    #[test]
    fn set_optional_hours_and_clear_them() {
        let mut cfg = Config::default();
        cfg.set("catalog.notification_hours", "0.5").unwrap();
        assert_eq!(cfg.catalog.notification_hours, Some(0.5));
        cfg.set("catalog.notification_hours", "none").unwrap();
        assert_eq!(cfg.catalog.notification_hours, None);
        assert_eq!(cfg.get("catalog.notification_hours").as_deref(), Some("none"));
    }

    #[test]
    fn cleared_default_estimate_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::load_from(&path).unwrap();
        cfg.set("catalog.essay_draft_hours", "none").unwrap();
        assert_eq!(cfg.catalog.essay_draft_hours, None);
        cfg.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.catalog.essay_draft_hours, None);
        assert_eq!(
            reloaded.catalog().default_hours(crate::item::ItemKind::EssayDraft),
            None
        );
        assert_eq!(reloaded.catalog.essay_final_hours, Some(1.0));

        let mut restored = reloaded;
        restored.set("catalog.essay_draft_hours", "2.5").unwrap();
        assert_eq!(restored.catalog.essay_draft_hours, Some(2.5));
    }

    #[test]
    fn catalog_accepts_integer_hours_and_rejects_words() {
        let parsed: Config = toml::from_str("[catalog]\ntimebox_hours = 3\n").unwrap();
        assert_eq!(parsed.catalog.timebox_hours, Some(3.0));
        assert!(toml::from_str::<Config>("[catalog]\ntimebox_hours = \"lots\"\n").is_err());
    }

    #[test]
    fn lead_time_is_bounded() {
        let mut cfg = Config::default();
        cfg.set("scheduler.lead_time_days", "365").unwrap();
        assert_eq!(cfg.scheduler.lead_time_days, MAX_LEAD_TIME_DAYS);
        assert!(matches!(
            cfg.set("scheduler.lead_time_days", "200000000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("scheduler.lead_time_days", "-1").is_err());
        assert_eq!(cfg.scheduler.lead_time_days, MAX_LEAD_TIME_DAYS);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("scheduler.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type_and_range() {
        let mut cfg = Config::default();
        assert!(cfg.set("scheduler.lead_time_days", "soon").is_err());
        assert!(cfg.set("scheduler.capacity_buffer", "0").is_err());
        assert!(cfg.set("catalog.timebox_hours", "-1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn catalog_and_scheduler_follow_config() {
        let mut cfg = Config::default();
        cfg.set("catalog.timebox_hours", "3").unwrap();
        cfg.set("scheduler.lead_time_days", "0").unwrap();
        assert_eq!(
            cfg.catalog().default_hours(crate::item::ItemKind::Timebox),
            Some(3.0)
        );
        assert_eq!(cfg.scheduler_config().lead_time_days, 0);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set("default_user", "alice").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().default_user, "alice");
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scheduler = 12").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
