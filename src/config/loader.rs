use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::fonts::FONT_SIZES;

const CONFIG_DIR: &str = "partsbin";
const CONFIG_FILE: &str = "config.toml";

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        tracing::debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;
    if config.font_size >= FONT_SIZES.len() {
        tracing::warn!(font_size = config.font_size, "Invalid font size in config, resetting");
        config.font_size = crate::fonts::DEFAULT_FONT_SIZE;
    }
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn save_to(config: &AppConfig, path: &Path) -> color_eyre::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    tracing::debug!("Saved config to {}", path.display());
    Ok(())
}

/// Apply `f` to the config stored at `path` and write it back.
///
/// Reads the file again so fields changed elsewhere are kept.
pub fn update(path: &Path, f: impl FnOnce(&mut AppConfig)) -> color_eyre::Result<()> {
    let mut config = load_from(path).unwrap_or_default();
    f(&mut config);
    save_to(&config, path)
}
