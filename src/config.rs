use crate::model::Settings;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "tapdeck";
const SETTINGS_FILE: &str = "settings.json";

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("TAPDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn settings_path() -> Result<PathBuf> {
    Ok(config_root()?.join(SETTINGS_FILE))
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let root = config_root()?;
    fs::create_dir_all(&root).with_context(|| format!("failed to create {}", root.display()))?;
    Ok(root)
}

pub fn load_settings() -> Result<Settings> {
    let path = settings_path()?;
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    ensure_config_dir()?;
    let path = settings_path()?;
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Single test because TAPDECK_CONFIG_DIR is process-global.
    #[test]
    fn settings_default_then_round_trip() {
        let dir = tempdir().expect("tempdir");
        unsafe {
            env::set_var("TAPDECK_CONFIG_DIR", dir.path().to_string_lossy().as_ref());
        }

        let fresh = load_settings().expect("load defaults");
        assert_eq!(fresh.music_dir, None);
        assert_eq!(fresh.saved_volume, 1.0);

        let settings = Settings {
            music_dir: Some(PathBuf::from("/music")),
            saved_volume: 0.5,
        };
        save_settings(&settings).expect("save");
        let loaded = load_settings().expect("load");
        assert_eq!(loaded.music_dir, Some(PathBuf::from("/music")));
        assert_eq!(loaded.saved_volume, 0.5);
    }
}
