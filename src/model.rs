use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub file_name: String,
    pub path: PathBuf,
    pub duration_seconds: Option<u32>,
}

impl Track {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            file_name,
            path,
            duration_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub music_dir: Option<PathBuf>,
    #[serde(default = "default_saved_volume")]
    pub saved_volume: f32,
}

fn default_saved_volume() -> f32 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_dir: None,
            saved_volume: default_saved_volume(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_from_path_uses_file_name() {
        let track = Track::from_path(PathBuf::from("music/a.mp3"));
        assert_eq!(track.file_name, "a.mp3");
        assert_eq!(track.duration_seconds, None);
    }

    #[test]
    fn settings_default_volume_survives_missing_field() {
        let settings: Settings = serde_json::from_str(r#"{"music_dir":null}"#).expect("parse");
        assert_eq!(settings.saved_volume, 1.0);
    }
}
