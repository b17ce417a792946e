use crate::audio::PlayerEngine;
use crate::core::{ControlId, DeckCore};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::time::Duration;

const APP_TITLE_WITH_VERSION: &str = "TapDeck v0.1.0  ";

#[derive(Clone, Copy)]
struct Palette {
    bg: Color,
    panel_bg: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    alert: Color,
}

fn palette() -> Palette {
    Palette {
        bg: Color::Rgb(10, 15, 24),
        panel_bg: Color::Rgb(19, 29, 43),
        border: Color::Rgb(69, 121, 176),
        text: Color::Rgb(214, 228, 248),
        muted: Color::Rgb(149, 173, 204),
        accent: Color::Rgb(100, 203, 184),
        alert: Color::Rgb(249, 174, 88),
    }
}

fn screen_areas(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

// Logical control name to screen region, recomputed from the same layout the
// renderer uses so mouse hit-testing always matches what is drawn.
pub fn control_rects(area: Rect) -> [(ControlId, Rect); 4] {
    let vertical = screen_areas(area);
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(vertical[2]);

    [
        (ControlId::Previous, row[0]),
        (ControlId::Play, row[1]),
        (ControlId::Stop, row[2]),
        (ControlId::Forward, row[3]),
    ]
}

pub fn draw(frame: &mut Frame, core: &DeckCore, engine: &dyn PlayerEngine) {
    let colors = palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg)),
        frame.area(),
    );

    let vertical = screen_areas(frame.area());

    let output = engine
        .output_name()
        .unwrap_or_else(|| String::from("no output"));
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            APP_TITLE_WITH_VERSION,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Tracks {}", core.catalog().len()),
            Style::default().fg(colors.text),
        ),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(output, Style::default().fg(colors.muted)),
    ]))
    .block(panel_block(
        "Status",
        colors.panel_bg,
        colors.text,
        colors.border,
    ));
    frame.render_widget(header, vertical[0]);

    let track = core.current_track();
    let duration_label = track
        .duration_seconds
        .map(|seconds| format_duration(Duration::from_secs(u64::from(seconds))))
        .unwrap_or_else(|| String::from("--:--"));
    let label_text = vec![
        Line::from(Span::styled(
            track.file_name.clone(),
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Track {} of {}  ({duration_label})",
                core.cursor_index() + 1,
                core.catalog().len()
            ),
            Style::default().fg(colors.muted),
        )),
    ];
    let label = Paragraph::new(label_text)
        .block(panel_block(
            "Now Selected",
            colors.panel_bg,
            colors.text,
            colors.border,
        ))
        .wrap(Wrap { trim: true });
    frame.render_widget(label, vertical[1]);

    for (control, rect) in control_rects(frame.area()) {
        let (glyph, hint) = match control {
            ControlId::Previous => ("⏮", "p"),
            ControlId::Play => (core.play_icon.glyph(), "space"),
            ControlId::Stop => ("⏹", "s"),
            ControlId::Forward => ("⏭", "n"),
        };
        let button = Paragraph::new(Line::from(Span::styled(
            glyph,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(panel_block(hint, colors.panel_bg, colors.muted, colors.border));
        frame.render_widget(button, rect);
    }

    let timeline = Paragraph::new(Span::styled(
        timeline_line(engine, 28, 12),
        Style::default().fg(colors.text),
    ))
    .block(panel_block(
        "Timeline",
        colors.panel_bg,
        colors.text,
        colors.border,
    ));
    frame.render_widget(timeline, vertical[3]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "Keys: Space play/pause, s stop, n next, p previous, +/- volume, q quit",
            Style::default().fg(colors.muted),
        ),
        Span::styled("  |  ", Style::default().fg(colors.muted)),
        Span::styled(core.status.as_str(), Style::default().fg(colors.alert)),
    ]))
    .block(panel_block(
        "Message",
        colors.panel_bg,
        colors.text,
        colors.border,
    ));
    frame.render_widget(footer, vertical[4]);
}

fn panel_block(title: &str, bg: Color, text: Color, border: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(text).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg))
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

fn progress_bar(ratio: Option<f64>, width: usize) -> String {
    let clamped = ratio.unwrap_or(0.0).clamp(0.0, 1.0);
    let filled = (clamped * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&"-".repeat(width.saturating_sub(filled)));
    bar.push(']');
    bar
}

fn timeline_line(
    engine: &dyn PlayerEngine,
    timeline_bar_width: usize,
    volume_bar_width: usize,
) -> String {
    let elapsed = engine.position().unwrap_or(Duration::ZERO);
    let total = engine.duration();
    let ratio = total.and_then(|duration| {
        let total_secs = duration.as_secs_f64();
        (total_secs > 0.0).then_some((elapsed.as_secs_f64() / total_secs).clamp(0.0, 1.0))
    });

    let total_label = total
        .map(format_duration)
        .unwrap_or_else(|| String::from("--:--"));
    let volume_percent = (engine.volume() * 100.0).round() as u16;
    let volume_ratio = f64::from(engine.volume().clamp(0.0, 1.0));

    format!(
        "{} {} {}  Vol {} {volume_percent}%",
        format_duration(elapsed),
        progress_bar(ratio, timeline_bar_width),
        total_label,
        progress_bar(Some(volume_ratio), volume_bar_width),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(65)), "01:05");
        assert_eq!(format_duration(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn progress_bar_fills_by_ratio() {
        assert_eq!(progress_bar(Some(0.0), 4), "[----]");
        assert_eq!(progress_bar(Some(0.5), 4), "[##--]");
        assert_eq!(progress_bar(Some(1.0), 4), "[####]");
        assert_eq!(progress_bar(None, 4), "[----]");
    }

    #[test]
    fn control_rects_cover_four_distinct_controls() {
        let rects = control_rects(Rect::new(0, 0, 80, 24));
        assert_eq!(rects.len(), 4);
        for (idx, (_, a)) in rects.iter().enumerate() {
            for (_, b) in rects.iter().skip(idx + 1) {
                assert_eq!(a.intersection(*b).area(), 0);
            }
        }
    }
}
