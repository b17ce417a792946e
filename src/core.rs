use crate::audio::PlayerEngine;
use crate::catalog::Catalog;
use crate::cursor::Cursor;
use crate::error::DeckError;
use crate::model::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Play,
    Stop,
    Forward,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Play,
    Pause,
}

impl IconState {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Pause => "⏸",
        }
    }
}

// Control state behind the four buttons. Owns the catalog and cursor and
// drives every engine transition; holds no cached play/pause flag, the icon
// is recomputed from the engine's live is_playing query after each action.
#[derive(Debug)]
pub struct DeckCore {
    catalog: Catalog,
    cursor: Cursor,
    pub play_icon: IconState,
    pub status: String,
    pub dirty: bool,
}

impl DeckCore {
    pub fn new(catalog: Catalog) -> Result<Self, DeckError> {
        let cursor = Cursor::new(catalog.len())?;
        Ok(Self {
            catalog,
            cursor,
            play_icon: IconState::Play,
            status: String::from("Ready"),
            dirty: true,
        })
    }

    // Startup binding: runs the readiness probe for the first track before
    // the event loop dispatches any control, so stop and the toggle never
    // address an unprepared engine.
    pub fn attach(&mut self, engine: &mut dyn PlayerEngine) {
        let path = self.current_track().path.clone();
        match engine.bind(&path) {
            Ok(()) => self.set_status(&format!("Loaded {}", self.current_track().file_name)),
            Err(err) => self.report_engine_error(&err.into()),
        }
        self.play_icon = IconState::Play;
        self.dirty = true;
    }

    pub fn tap(&mut self, engine: &mut dyn PlayerEngine, control: ControlId) {
        match control {
            ControlId::Play => self.toggle_clicked(engine),
            ControlId::Stop => self.stop_clicked(engine),
            ControlId::Forward => self.next_clicked(engine),
            ControlId::Previous => self.previous_clicked(engine),
        }
    }

    pub fn toggle_clicked(&mut self, engine: &mut dyn PlayerEngine) {
        if engine.is_playing() {
            engine.pause();
            self.play_icon = IconState::Play;
            self.set_status("Paused");
        } else {
            match engine.start() {
                Ok(()) => {
                    self.play_icon = IconState::Pause;
                    self.set_status(&format!("Playing {}", self.current_track().file_name));
                }
                Err(err) => self.report_engine_error(&err.into()),
            }
        }
    }

    pub fn stop_clicked(&mut self, engine: &mut dyn PlayerEngine) {
        if engine.is_playing() {
            engine.pause();
            self.play_icon = IconState::Play;
        }
        match engine.restart_from_beginning() {
            Ok(()) => self.set_status("Stopped"),
            Err(err) => self.report_engine_error(&err.into()),
        }
    }

    pub fn next_clicked(&mut self, engine: &mut dyn PlayerEngine) {
        self.cursor.advance();
        self.refresh_song(engine);
    }

    pub fn previous_clicked(&mut self, engine: &mut dyn PlayerEngine) {
        self.cursor.retreat();
        self.refresh_song(engine);
    }

    // The only path that changes tracks; always force-starts playback.
    fn refresh_song(&mut self, engine: &mut dyn PlayerEngine) {
        engine.reset();
        let track = self.current_track().clone();
        match engine.bind(&track.path).and_then(|()| engine.start()) {
            Ok(()) => {
                self.play_icon = IconState::Pause;
                self.set_status(&format!("Playing {}", track.file_name));
            }
            Err(err) => self.report_engine_error(&err.into()),
        }
    }

    pub fn current_track(&self) -> &Track {
        self.catalog.track(self.cursor.index())
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn report_engine_error(&mut self, err: &DeckError) {
        self.play_icon = IconState::Play;
        self.set_status(&format!("playback error: {err}"));
    }

    fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.dirty = true;
    }
}
