use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::{
    location::{FixedPosition, IpPosition, PositionSource},
    model::{Coordinates, UnitPreference},
    provider::openweather::DEFAULT_BASE_URL,
    view::DEFAULT_ICON_BASE_URL,
};

/// Where the "current position" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSourceKind {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// The `[position]` table of the config file.
    Fixed,
}

impl PositionSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSourceKind::Ip => "ip",
            PositionSourceKind::Fixed => "fixed",
        }
    }

    pub const fn all() -> &'static [PositionSourceKind] {
        &[PositionSourceKind::Ip, PositionSourceKind::Fixed]
    }
}

impl std::fmt::Display for PositionSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// position_source = "fixed"
///
/// [position]
/// latitude = 19.43
/// longitude = -99.13
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Override for the weather API host, mainly for testing.
    pub base_url: Option<String>,

    /// Override for the icon host.
    pub icon_base_url: Option<String>,

    /// Unit preference a session starts with.
    pub units: UnitPreference,

    /// Replacement for the bundled city table.
    pub city_list: Option<PathBuf>,

    pub position_source: PositionSourceKind,

    pub position: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-card", "weather-card")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, treating a blank value as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn icon_base_url(&self) -> &str {
        self.icon_base_url.as_deref().unwrap_or(DEFAULT_ICON_BASE_URL)
    }

    /// Build the configured position source.
    pub fn position_source(&self) -> Box<dyn PositionSource> {
        match self.position_source {
            PositionSourceKind::Ip => Box::new(IpPosition::new()),
            PositionSourceKind::Fixed => Box::new(FixedPosition::new(self.position)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.api_key().is_none());
        assert_eq!(cfg.units, UnitPreference::Metric);
        assert_eq!(cfg.position_source, PositionSourceKind::Ip);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.icon_base_url(), DEFAULT_ICON_BASE_URL);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.units = UnitPreference::Imperial;
        cfg.position_source = PositionSourceKind::Fixed;
        cfg.position = Some(Coordinates::new(19.43, -99.13));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key(), Some("OPEN_KEY"));
        assert_eq!(loaded.units, UnitPreference::Imperial);
        assert_eq!(loaded.position_source, PositionSourceKind::Fixed);
        assert_eq!(loaded.position, Some(Coordinates::new(19.43, -99.13)));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(r#"api_key = "abc""#).unwrap();
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.units, UnitPreference::Metric);
        assert!(cfg.position.is_none());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_replace_default_urls() {
        let cfg = Config {
            base_url: Some("http://localhost:1".into()),
            icon_base_url: Some("http://icons.local".into()),
            ..Config::default()
        };
        assert_eq!(cfg.base_url(), "http://localhost:1");
        assert_eq!(cfg.icon_base_url(), "http://icons.local");
    }
}
