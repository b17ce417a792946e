use crate::audio::{NullEngine, PlayerEngine, RodioEngine};
use crate::catalog::Catalog;
use crate::config;
use crate::core::{ControlId, DeckCore};
use crate::model::Settings;
use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Rect;
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct AppStartupOptions {
    pub music_dir: Option<PathBuf>,
    pub force_mute: bool,
}

pub fn run_with_startup(options: AppStartupOptions) -> Result<()> {
    let settings = config::load_settings()?;
    let music_dir = options
        .music_dir
        .clone()
        .or_else(|| settings.music_dir.clone())
        .context("no music directory configured; pass --dir <path>")?;

    let catalog = Catalog::scan(&music_dir);
    let mut core = DeckCore::new(catalog)
        .with_context(|| format!("scanning music directory {}", music_dir.display()))?;

    let mut engine: Box<dyn PlayerEngine> = if options.force_mute {
        Box::new(NullEngine::new())
    } else {
        match RodioEngine::new() {
            Ok(engine) => Box::new(engine),
            Err(_) => Box::new(NullEngine::new()),
        }
    };
    engine.set_volume(settings.saved_volume);
    core.attach(&mut *engine);

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut last_tick = Instant::now();
    let mut screen = Rect::default();

    let result: Result<()> = loop {
        if core.dirty || last_tick.elapsed() > Duration::from_millis(250) {
            terminal.draw(|frame| {
                screen = frame.area();
                crate::ui::draw(frame, &core, &*engine)
            })?;
            core.dirty = false;
            last_tick = Instant::now();
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        match event::read()? {
            Event::Mouse(mouse) => handle_mouse(&mut core, &mut *engine, mouse, screen),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if dispatch_key(&mut core, &mut *engine, key.code, key.modifiers) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    config::save_settings(&Settings {
        music_dir: Some(music_dir),
        saved_volume: engine.volume(),
    })?;
    result
}

// Returns true when the app should quit.
fn dispatch_key(
    core: &mut DeckCore,
    engine: &mut dyn PlayerEngine,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') | KeyCode::Enter => core.tap(engine, ControlId::Play),
        KeyCode::Char('s') => core.tap(engine, ControlId::Stop),
        KeyCode::Char('n') | KeyCode::Right => core.tap(engine, ControlId::Forward),
        KeyCode::Char('p') | KeyCode::Left => core.tap(engine, ControlId::Previous),
        KeyCode::Char('+') | KeyCode::Char('=') => adjust_volume(core, engine, 0.05),
        KeyCode::Char('-') => adjust_volume(core, engine, -0.05),
        _ => {}
    }
    false
}

fn adjust_volume(core: &mut DeckCore, engine: &mut dyn PlayerEngine, delta: f32) {
    let next = (engine.volume() + delta).clamp(0.0, 2.0);
    engine.set_volume(next);
    core.status = format!("Volume: {}%", (next * 100.0).round() as u16);
    core.dirty = true;
}

fn handle_mouse(
    core: &mut DeckCore,
    engine: &mut dyn PlayerEngine,
    mouse: MouseEvent,
    screen: Rect,
) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }

    for (control, rect) in crate::ui::control_rects(screen) {
        if point_in_rect(mouse.column, mouse.row, rect) {
            core.tap(engine, control);
            return;
        }
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}
