//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::audio::{Equalizer, MAX_GAIN_DB, PlaybackState, PlaylistEntry, ProgressReport};
use crate::config::UiSettings;
use crate::library::TrackFormat;

/// Key hints in the order they are shown in the footer.
const CONTROLS: [(&str, &str); 11] = [
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("s", "stop"),
    ("+/-", "volume"),
    ("tab", "band"),
    ("u/d", "gain up/down"),
    ("a", "add path"),
    ("c", "clear"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format whole seconds as `MM:SS`.
fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// A `width`-cell bar filled to `percent`.
fn progress_bar(percent: f64, width: u16) -> String {
    let width = usize::from(width);
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "─".repeat(width - filled))
}

/// `mm:ss/mm:ss [████───] 42.0%`
fn progress_line(report: &ProgressReport, width: u16) -> String {
    format!(
        "{}/{} [{}] {:.1}%",
        format_mmss(report.elapsed_secs),
        format_mmss(report.total_secs),
        progress_bar(report.percent, width),
        report.percent
    )
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Idle",
        PlaybackState::Loading => "Loading",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    }
}

/// `44.1 kHz 16-bit 2ch`; bit depth is left out for lossy formats.
fn format_text(format: &TrackFormat) -> String {
    let rate = format!("{} kHz", f64::from(format.sample_rate) / 1000.0);
    match format.bit_depth {
        Some(bits) => format!("{rate} {bits}-bit {}ch", format.channels),
        None => format!("{rate} {}ch", format.channels),
    }
}

/// Tag summary of one track. Missing tags read `Unknown`.
fn track_info_text(entry: &PlaylistEntry) -> String {
    let tags = &entry.tags;
    let or_unknown = |v: Option<&str>| v.unwrap_or("Unknown").to_string();
    let genres = if tags.genres.is_empty() {
        "Unknown".to_string()
    } else {
        tags.genres.join(", ")
    };

    let mut parts = vec![
        format!("Title: {}", entry.title),
        format!("Artist: {}", or_unknown(tags.artist.as_deref())),
        format!("Album: {}", or_unknown(tags.album.as_deref())),
        format!(
            "Year: {}",
            tags.year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        ),
        format!("Genre: {genres}"),
        format_text(&entry.format),
    ];
    if tags.has_lyrics {
        parts.push("lyrics".to_string());
    }
    if tags.pictures > 0 {
        parts.push(format!("art: {}", tags.pictures));
    }
    parts.join(" • ")
}

fn band_label(frequency: f32) -> String {
    if frequency >= 1000.0 {
        format!("{}k", frequency / 1000.0)
    } else {
        format!("{frequency}")
    }
}

/// Half-width bar for a gain in dB: left of the center for cuts, right for boosts.
fn gain_bar(gain_db: f32, half: usize) -> String {
    let cells = ((gain_db.abs() / MAX_GAIN_DB) * half as f32).round() as usize;
    let cells = cells.min(half);
    if gain_db < 0.0 {
        format!(
            "{}{}|{}",
            " ".repeat(half - cells),
            "■".repeat(cells),
            " ".repeat(half)
        )
    } else {
        format!(
            "{}|{}{}",
            " ".repeat(half),
            "■".repeat(cells),
            " ".repeat(half - cells)
        )
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn now_playing_text(app: &App, ui: &UiSettings) -> String {
    let status = &app.status;
    let entry = status.current.and_then(|i| status.playlist.get(i));
    let song = entry.map(|e| e.display.as_str()).unwrap_or("-");

    let mut lines = vec![format!("Song: {song}")];
    if let Some(entry) = entry {
        lines.push(track_info_text(entry));
    }
    if app.is_active() {
        lines.push(progress_line(&app.progress, ui.progress_bar_width));
    } else {
        lines.push(progress_line(&ProgressReport::default(), ui.progress_bar_width));
    }
    lines.push(format!(
        "{} • Volume: {:.0}%{}",
        state_label(status.state),
        status.volume * 100.0,
        app.message
            .as_deref()
            .map(|m| format!(" • {m}"))
            .unwrap_or_default()
    ));
    lines.join("\n")
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" allegro ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let now_playing = Paragraph::new(now_playing_text(app, ui_settings))
        .block(left_padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(chunks[2]);

    // Playlist
    {
        let items: Vec<ListItem> = app
            .status
            .playlist
            .iter()
            .map(|e| {
                let marker = if e.is_current { "▶ " } else { "  " };
                ListItem::new(format!(
                    "{marker}{} [{}]",
                    e.display,
                    format_mmss(e.duration_secs)
                ))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if app.has_tracks() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, body[0], &mut state);
    }

    // Equalizer
    {
        let eq = Equalizer::from_gains(&app.status.gains);
        let items: Vec<ListItem> = eq
            .bands()
            .iter()
            .map(|band| {
                let gain = band.gain_db();
                ListItem::new(format!(
                    "{:>4} {:+5.1} {}",
                    band_label(band.frequency),
                    gain,
                    gain_bar(gain, 6)
                ))
            })
            .collect();
        let title = format!(" equalizer (dB) x{:.2} ", eq.combined_gain());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        state.select(Some(app.selected_band));
        frame.render_stateful_widget(list, body[1], &mut state);
    }

    let footer = Paragraph::new(controls_text())
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if app.mode == InputMode::AddPath {
        let area = centered_rect_sized(60, 3, chunks[2]);
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!("{}█", app.input))
            .block(left_padded(" add file or directory (enter/esc) "));
        frame.render_widget(prompt, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::TrackTags;

    #[test]
    fn mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(3599), "59:59");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "────");
        assert_eq!(progress_bar(50.0, 4), "██──");
        assert_eq!(progress_bar(100.0, 4), "████");
        assert_eq!(progress_bar(250.0, 4), "████");
    }

    #[test]
    fn progress_line_layout() {
        let report = ProgressReport {
            elapsed_secs: 75,
            total_secs: 300,
            percent: 25.0,
        };
        assert_eq!(progress_line(&report, 4), "01:15/05:00 [█───] 25.0%");
    }

    #[test]
    fn gain_bar_is_centered() {
        assert_eq!(gain_bar(0.0, 2), "  |  ");
        assert_eq!(gain_bar(12.0, 2), "  |■■");
        assert_eq!(gain_bar(-6.0, 2), " ■|  ");
    }

    fn entry_with(tags: TrackTags) -> PlaylistEntry {
        PlaylistEntry {
            index: 0,
            title: "Intro".to_string(),
            display: "Band - Intro".to_string(),
            duration_secs: 90,
            is_current: true,
            format: TrackFormat {
                sample_rate: 44_100,
                channels: 2,
                bit_depth: Some(16),
            },
            tags,
        }
    }

    #[test]
    fn track_info_lists_tags() {
        let tags = TrackTags {
            title: Some("Intro".into()),
            artist: Some("Band".into()),
            album: Some("First".into()),
            year: Some(2019),
            genres: vec!["Rock".into(), "Pop".into()],
            has_lyrics: true,
            pictures: 1,
        };
        assert_eq!(
            track_info_text(&entry_with(tags)),
            "Title: Intro • Artist: Band • Album: First • Year: 2019 • Genre: Rock, Pop \
             • 44.1 kHz 16-bit 2ch • lyrics • art: 1"
        );
    }

    #[test]
    fn track_info_marks_missing_tags_unknown() {
        let mut entry = entry_with(TrackTags::default());
        entry.format.bit_depth = None;
        assert_eq!(
            track_info_text(&entry),
            "Title: Intro • Artist: Unknown • Album: Unknown • Year: Unknown \
             • Genre: Unknown • 44.1 kHz 2ch"
        );
    }

    #[test]
    fn band_labels() {
        assert_eq!(band_label(60.0), "60");
        assert_eq!(band_label(1000.0), "1k");
        assert_eq!(band_label(12000.0), "12k");
    }
}
