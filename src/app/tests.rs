use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::*;
use crate::audio::{PlaybackState, PlayerStatus, PlaylistEntry, ProgressReport};
use crate::library::{TrackFormat, TrackTags};

fn entry(index: usize, title: &str) -> PlaylistEntry {
    PlaylistEntry {
        index,
        title: title.into(),
        display: title.into(),
        duration_secs: 180,
        is_current: false,
        format: TrackFormat {
            sample_rate: 44_100,
            channels: 2,
            bit_depth: None,
        },
        tags: TrackTags::default(),
    }
}

fn status(titles: &[&str], current: Option<usize>) -> PlayerStatus {
    PlayerStatus {
        state: if current.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        },
        current,
        volume: 0.5,
        gains: vec![0.0; 10],
        playlist: titles
            .iter()
            .enumerate()
            .map(|(i, t)| entry(i, t))
            .collect(),
        last_error: None,
    }
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut app = App::new();
    app.apply_snapshot(status(&["a", "b", "c"], None), ProgressReport::default());

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn selection_on_empty_playlist_stays_put() {
    let mut app = App::new();
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
}

#[test]
fn cursor_follows_current_track_only_when_it_changes() {
    let mut app = App::new();
    app.apply_snapshot(status(&["a", "b", "c"], Some(1)), ProgressReport::default());
    assert_eq!(app.selected, 1);

    // user moves away; same current track must not pull the cursor back
    app.next();
    app.apply_snapshot(status(&["a", "b", "c"], Some(1)), ProgressReport::default());
    assert_eq!(app.selected, 2);

    app.apply_snapshot(status(&["a", "b", "c"], Some(0)), ProgressReport::default());
    assert_eq!(app.selected, 0);

    app.follow_playback_off();
    app.apply_snapshot(status(&["a", "b", "c"], Some(2)), ProgressReport::default());
    assert_eq!(app.selected, 0);
}

#[test]
fn selection_is_clamped_when_playlist_shrinks() {
    let mut app = App::new();
    app.apply_snapshot(status(&["a", "b", "c"], None), ProgressReport::default());
    app.selected = 2;
    app.apply_snapshot(status(&["a"], None), ProgressReport::default());
    assert_eq!(app.selected, 0);
}

#[test]
fn refresh_reads_attached_handles() {
    let st = Arc::new(Mutex::new(status(&["a", "b"], Some(1))));
    let report = ProgressReport {
        elapsed_secs: 30,
        total_secs: 120,
        percent: 25.0,
    };
    let progress = Arc::new(Mutex::new(Some(report)));

    let mut app = App::new();
    app.set_status_handle(st.clone());
    app.set_progress_handle(progress);
    app.refresh();

    assert_eq!(app.track_count(), 2);
    assert_eq!(app.progress, report);
    assert!(app.is_active());

    st.lock().unwrap().last_error = Some("boom".into());
    app.refresh();
    assert_eq!(app.message.as_deref(), Some("boom"));
}

#[test]
fn band_cursor_and_steps_are_bounded() {
    let mut app = App::new();
    let mut st = status(&[], None);
    st.gains[9] = 11.5;
    st.volume = 0.98;
    app.apply_snapshot(st, ProgressReport::default());

    app.prev_band();
    assert_eq!(app.selected_band, 9);
    assert_eq!(app.stepped_gain(1.0), 12.0);
    app.next_band();
    assert_eq!(app.selected_band, 0);
    assert_eq!(app.stepped_gain(-20.0), -12.0);

    assert_eq!(app.stepped_volume(0.05), 1.0);
    assert!((app.stepped_volume(-0.05) - 0.93).abs() < 1e-6);
}

#[test]
fn add_path_prompt_collects_input() {
    let mut app = App::new();
    app.enter_add_path();
    assert_eq!(app.mode, InputMode::AddPath);
    for c in "/tmp/songx".chars() {
        app.push_input_char(c);
    }
    app.pop_input_char();

    assert_eq!(app.take_input(), Some(PathBuf::from("/tmp/song")));
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.input.is_empty());

    app.enter_add_path();
    app.push_input_char(' ');
    assert_eq!(app.take_input(), None);

    app.enter_add_path();
    app.push_input_char('x');
    app.cancel_input();
    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.input.is_empty());
}
