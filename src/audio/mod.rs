use crate::error::EngineError;
use anyhow::{Context, Result};
use rodio::Source;
use rodio::{Decoder, DeviceSinkBuilder, MixerDeviceSink, Player};
#[cfg(unix)]
use std::ffi::CString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::time::Instant;

const MAX_VOLUME: f32 = 2.0;

// The engine owns the decoding resource. A track must be bound (which runs
// the blocking decode-readiness probe) before start/pause/restart are valid,
// and reset releases the binding again.
pub trait PlayerEngine {
    fn bind(&mut self, path: &Path) -> Result<(), EngineError>;
    fn start(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    fn restart_from_beginning(&mut self) -> Result<(), EngineError>;
    fn reset(&mut self);
    fn is_playing(&self) -> bool;
    fn bound_track(&self) -> Option<&Path>;
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn output_name(&self) -> Option<String>;
}

pub struct RodioEngine {
    stream: MixerDeviceSink,
    sink: Player,
    bound: Option<PathBuf>,
    track_duration: Option<Duration>,
    volume: f32,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let mut stream = with_silenced_stderr(|| {
            DeviceSinkBuilder::from_default_device()
                .context("failed to open default system output stream")?
                .with_error_callback(|_| {})
                .open_sink_or_fallback()
                .context("failed to start default output stream")
        })?;
        stream.log_on_drop(false);
        let sink = Player::connect_new(stream.mixer());

        Ok(Self {
            stream,
            sink,
            bound: None,
            track_duration: None,
            volume: 1.0,
        })
    }
}

impl PlayerEngine for RodioEngine {
    fn bind(&mut self, path: &Path) -> Result<(), EngineError> {
        self.sink.stop();
        self.sink = Player::connect_new(self.stream.mixer());

        let file = File::open(path).map_err(|source| EngineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // The decoder takes ownership of the handle; constructing it is the
        // blocking readiness probe, so a rejected source fails here and the
        // handle is released with the failed decoder.
        let source = Decoder::try_from(file).map_err(|source| EngineError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        self.track_duration = source.total_duration();
        self.sink.pause();
        self.sink.append(source);
        self.sink.set_volume(self.volume);
        self.bound = Some(path.to_path_buf());
        Ok(())
    }

    fn start(&mut self) -> Result<(), EngineError> {
        if self.bound.is_none() {
            return Err(EngineError::NotBound);
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn restart_from_beginning(&mut self) -> Result<(), EngineError> {
        let Some(path) = self.bound.clone() else {
            return Err(EngineError::NotBound);
        };

        self.sink.pause();
        if self.sink.empty() {
            // A drained sink has nothing left to seek; rebuild the source
            // from the file, still paused at offset zero.
            return self.bind(&path);
        }
        self.sink
            .try_seek(Duration::ZERO)
            .map_err(|err| EngineError::Seek(format!("{err:?}")))?;
        Ok(())
    }

    fn reset(&mut self) {
        self.sink.stop();
        self.bound = None;
        self.track_duration = None;
    }

    fn is_playing(&self) -> bool {
        self.bound.is_some() && !self.sink.is_paused() && !self.sink.empty()
    }

    fn bound_track(&self) -> Option<&Path> {
        self.bound.as_deref()
    }

    fn position(&self) -> Option<Duration> {
        self.bound.as_ref()?;
        Some(self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.track_duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, MAX_VOLUME);
        self.sink.set_volume(self.volume);
    }

    fn output_name(&self) -> Option<String> {
        Some(String::from("System default output (CPAL)"))
    }
}

#[cfg(unix)]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    let saved = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved < 0 {
        return operation();
    }

    let devnull = CString::new("/dev/null")
        .ok()
        .map(|path| unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) })
        .unwrap_or(-1);

    if devnull >= 0 {
        unsafe {
            libc::dup2(devnull, libc::STDERR_FILENO);
            libc::close(devnull);
        }
    }

    let result = operation();

    unsafe {
        libc::dup2(saved, libc::STDERR_FILENO);
        libc::close(saved);
    }

    result
}

#[cfg(not(unix))]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    operation()
}

// Silent stand-in used when no output device exists and by the test suite.
// Keeps a logical playback clock so position/pause semantics stay observable.
pub struct NullEngine {
    bound: Option<PathBuf>,
    playing: bool,
    started_at: Option<Instant>,
    position_offset: Duration,
    track_duration: Option<Duration>,
    volume: f32,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            bound: None,
            playing: false,
            started_at: None,
            position_offset: Duration::ZERO,
            track_duration: None,
            volume: 1.0,
        }
    }

    fn estimate_duration(path: &Path) -> Option<Duration> {
        let file = File::open(path).ok()?;
        let source = Decoder::try_from(file).ok()?;
        source
            .total_duration()
            .filter(|duration| !duration.is_zero())
    }

    fn current_position(&self) -> Duration {
        let mut position = self.position_offset;
        if self.playing && let Some(started_at) = self.started_at {
            position = position.saturating_add(started_at.elapsed());
        }
        if let Some(duration) = self.track_duration {
            return position.min(duration);
        }
        position
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerEngine for NullEngine {
    fn bind(&mut self, path: &Path) -> Result<(), EngineError> {
        self.bound = Some(path.to_path_buf());
        self.playing = false;
        self.started_at = None;
        self.position_offset = Duration::ZERO;
        self.track_duration = Self::estimate_duration(path);
        Ok(())
    }

    fn start(&mut self) -> Result<(), EngineError> {
        if self.bound.is_none() {
            return Err(EngineError::NotBound);
        }
        self.playing = true;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        self.position_offset = self.current_position();
        self.started_at = None;
        self.playing = false;
    }

    fn restart_from_beginning(&mut self) -> Result<(), EngineError> {
        if self.bound.is_none() {
            return Err(EngineError::NotBound);
        }
        self.playing = false;
        self.started_at = None;
        self.position_offset = Duration::ZERO;
        Ok(())
    }

    fn reset(&mut self) {
        self.bound = None;
        self.playing = false;
        self.started_at = None;
        self.position_offset = Duration::ZERO;
        self.track_duration = None;
    }

    fn is_playing(&self) -> bool {
        self.playing && self.bound.is_some()
    }

    fn bound_track(&self) -> Option<&Path> {
        self.bound.as_deref()
    }

    fn position(&self) -> Option<Duration> {
        self.bound.as_ref()?;
        Some(self.current_position())
    }

    fn duration(&self) -> Option<Duration> {
        self.track_duration
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, MAX_VOLUME);
    }

    fn output_name(&self) -> Option<String> {
        Some(String::from("Null audio engine"))
    }
}

#[cfg(test)]
mod tests {
    use super::{NullEngine, PlayerEngine};
    use crate::error::EngineError;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn start_before_bind_is_rejected() {
        let mut engine = NullEngine::new();
        assert!(matches!(engine.start(), Err(EngineError::NotBound)));
        assert!(!engine.is_playing());
    }

    #[test]
    fn bind_leaves_the_engine_paused() {
        let mut engine = NullEngine::new();
        engine
            .bind(Path::new("missing-track.mp3"))
            .expect("null bind succeeds");
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), Some(Duration::ZERO));
    }

    #[test]
    fn position_advances_while_playing_and_freezes_on_pause() {
        let mut engine = NullEngine::new();
        engine
            .bind(Path::new("missing-track.mp3"))
            .expect("null bind succeeds");
        engine.start().expect("start");
        thread::sleep(Duration::from_millis(20));

        engine.pause();
        let paused = engine.position().expect("position");
        assert!(paused > Duration::ZERO);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(engine.position(), Some(paused));
    }

    #[test]
    fn restart_seeks_to_start_without_resuming() {
        let mut engine = NullEngine::new();
        engine
            .bind(Path::new("missing-track.mp3"))
            .expect("null bind succeeds");
        engine.start().expect("start");
        thread::sleep(Duration::from_millis(20));

        engine.restart_from_beginning().expect("restart");
        assert!(!engine.is_playing());
        assert_eq!(engine.position(), Some(Duration::ZERO));
    }

    #[test]
    fn restart_without_binding_is_rejected() {
        let mut engine = NullEngine::new();
        assert!(matches!(
            engine.restart_from_beginning(),
            Err(EngineError::NotBound)
        ));
    }

    #[test]
    fn reset_requires_a_fresh_bind() {
        let mut engine = NullEngine::new();
        engine
            .bind(Path::new("missing-track.mp3"))
            .expect("null bind succeeds");
        engine.start().expect("start");

        engine.reset();
        assert!(!engine.is_playing());
        assert_eq!(engine.bound_track(), None);
        assert!(matches!(engine.start(), Err(EngineError::NotBound)));
    }

    #[test]
    fn volume_is_clamped() {
        let mut engine = NullEngine::new();
        engine.set_volume(9.0);
        assert_eq!(engine.volume(), 2.0);
        engine.set_volume(-1.0);
        assert_eq!(engine.volume(), 0.0);
    }
}
