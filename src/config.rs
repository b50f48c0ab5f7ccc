use anyhow::{Context, Result};
use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that points at an explicit config file
pub const CONFIG_PATH_ENV: &str = "BOOKFORM_CONFIG_PATH";

pub const DEFAULT_ACKNOWLEDGMENT: &str =
    "Appointment request submitted successfully! We will contact you shortly.";
pub const DEFAULT_INVALID_CLASS: &str = "is-invalid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    #[serde(with = "hhmm")]
    pub opens_at: NaiveTime,
    #[serde(with = "hhmm")]
    pub closes_at: NaiveTime,
    pub step_minutes: u32,
    /// Earliest date the picker allows, in days from today
    pub min_date_offset_days: u32,
    /// Date preselected on load and after a reset, in days from today
    pub default_date_offset_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Class toggled on a field that fails its rule
    pub invalid_class: String,
    /// Notice shown after an accepted submission
    pub acknowledgment: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            opens_at: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
            closes_at: NaiveTime::from_hms_opt(21, 0, 0).expect("21:00 is a valid time"),
            step_minutes: 15,
            min_date_offset_days: 0,
            default_date_offset_days: 1,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            invalid_class: DEFAULT_INVALID_CLASS.to_string(),
            acknowledgment: DEFAULT_ACKNOWLEDGMENT.to_string(),
        }
    }
}

impl Config {
    /// Load from the configured path. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let proj_dirs = ProjectDirs::from("com", "bookform", "bookform")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Times are written the way a time input shows them: `HH:MM`
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.window.opens_at, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.window.closes_at, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
        assert_eq!(config.window.step_minutes, 15);
        assert_eq!(config.window.min_date_offset_days, 0);
        assert_eq!(config.window.default_date_offset_days, 1);
        assert_eq!(config.feedback.invalid_class, "is-invalid");
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.window.closes_at = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        config.save_to(&config_path)?;

        let written = fs::read_to_string(&config_path)?;
        assert!(written.contains("closes_at = \"18:30\""));

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml"))?;
        assert_eq!(loaded, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[window]\nstep_minutes = 30\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.window.step_minutes, 30);
        assert_eq!(loaded.window.opens_at, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(loaded.feedback, FeedbackConfig::default());
        Ok(())
    }

    #[test]
    fn test_bad_time_is_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[window]\nopens_at = \"nine\"\n")?;

        assert!(Config::load_from(&config_path).is_err());
        Ok(())
    }
}
