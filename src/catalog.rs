use crate::model::Track;
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::get_probe;
use walkdir::WalkDir;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac", "opus"];

// Fixed, ordered list of playable files. Built once at startup and never
// mutated afterward; the cursor indexes into it for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tracks: Vec<Track>,
}

impl Catalog {
    // An unreadable directory yields an empty catalog; emptiness is rejected
    // later when the cursor is constructed.
    pub fn scan(root: &Path) -> Self {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_audio(path) {
                continue;
            }

            let mut track = Track::from_path(path.to_path_buf());
            track.duration_seconds = probe_duration_seconds(path);
            tracks.push(track);
        }

        tracks.sort_by(|a, b| {
            a.file_name
                .to_ascii_lowercase()
                .cmp(&b.file_name.to_ascii_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index]
    }
}

fn is_audio(path: &Path) -> bool {
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or_default();
    AUDIO_EXTENSIONS
        .iter()
        .any(|supported| ext.eq_ignore_ascii_case(supported))
}

pub fn probe_duration_seconds(path: &Path) -> Option<u32> {
    let Ok(file) = File::open(path) else {
        return None;
    };
    let source = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(OsStr::to_str) {
        hint.with_extension(extension);
    }

    let Ok(probed) = get_probe().format(
        &hint,
        source,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) else {
        return None;
    };

    probed
        .format
        .default_track()
        .and_then(|track| codec_duration_seconds(&track.codec_params))
}

fn codec_duration_seconds(codec_params: &symphonia::core::codecs::CodecParameters) -> Option<u32> {
    if let (Some(time_base), Some(frame_count)) = (codec_params.time_base, codec_params.n_frames) {
        let time = time_base.calc_time(frame_count);
        let mut seconds = time.seconds as u32;
        if time.frac >= 0.5 {
            seconds = seconds.saturating_add(1);
        }
        return Some(seconds);
    }

    if let Some((frame_count, sample_rate)) = codec_params
        .n_frames
        .zip(codec_params.sample_rate)
        .filter(|(_, sample_rate)| *sample_rate > 0)
    {
        let seconds = ((frame_count as f64) / (sample_rate as f64)).round();
        return Some(seconds.clamp(0.0, u32::MAX as f64) as u32);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scan_keeps_only_audio_extensions() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("a.mp3"), b"x").expect("write mp3");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write txt");

        let catalog = Catalog::scan(dir.path());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.track(0).file_name, "a.mp3");
    }

    #[test]
    fn scan_orders_by_file_name() {
        let dir = tempdir().expect("tempdir");
        for name in ["c.mp3", "a.mp3", "B.mp3"] {
            fs::write(dir.path().join(name), b"x").expect("write");
        }

        let catalog = Catalog::scan(dir.path());
        let names: Vec<&str> = catalog
            .tracks
            .iter()
            .map(|track| track.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.mp3", "B.mp3", "c.mp3"]);
    }

    #[test]
    fn unreadable_directory_yields_empty_catalog() {
        let catalog = Catalog::scan(Path::new("this/directory/does/not/exist"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn duration_probe_tolerates_undecodable_files() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.mp3");
        fs::write(&path, b"not really audio").expect("write");
        assert_eq!(probe_duration_seconds(&path), None);
    }
}
