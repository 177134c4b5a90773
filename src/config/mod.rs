pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{config_path, load};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::fonts::DEFAULT_FONT_SIZE;
use crate::logging::LogLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Document store file. Defaults to `<data dir>/partsbin/inventory.json`.
    pub path: Option<PathBuf>,
    /// Seconds between two reloads of the cached collections.
    pub refresh_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            refresh_secs: 10,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map_or_else(|| PathBuf::from("."), |p| p.join("partsbin"))
                .join("inventory.json")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    pub keybindings: KeybindingsConfig,
    pub log_level: LogLevel,
    /// Index into [`crate::fonts::FONT_SIZES`].
    pub font_size: usize,
    /// Amount added or removed by the quantity +/- keys.
    pub quantity_step: f32,
    pub store: StoreConfig,
    /// Where CSV exports are written. Defaults to the user's document directory.
    pub export_dir: Option<PathBuf>,
    pub last_seen_version: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            keybindings: KeybindingsConfig::default(),
            log_level: LogLevel::Info,
            font_size: DEFAULT_FONT_SIZE,
            quantity_step: 1.0,
            store: StoreConfig::default(),
            export_dir: None,
            last_seen_version: None,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| {
            dirs::document_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "Warning"

            [store]
            refresh_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Warning);
        assert_eq!(config.store.refresh_secs, 30);
        assert_eq!(config.store.path, None);
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.theme, ThemeConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.quantity_step = 5.0;
        config.last_seen_version = Some("1.0.0".to_string());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
