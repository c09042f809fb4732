//! Application model types: `App` and `InputMode`.
//!
//! The `App` struct holds the latest controller snapshot, the playlist cursor,
//! the equalizer cursor and the add-path prompt used by the UI and runtime.

use std::path::PathBuf;

use crate::audio::{
    BAND_COUNT, MAX_GAIN_DB, MIN_GAIN_DB, PlaybackState, PlayerStatus, ProgressHandle,
    ProgressReport, StatusHandle,
};

/// What key presses currently edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to admit.
    AddPath,
}

/// The main application model.
pub struct App {
    pub status: PlayerStatus,
    pub progress: ProgressReport,
    pub selected: usize,
    pub selected_band: usize,
    pub mode: InputMode,
    pub input: String,
    /// One-line notice shown under the now-playing block.
    pub message: Option<String>,

    /// Cursor jumps to the current track when playback moves on.
    pub follow_playback: bool,

    status_handle: Option<StatusHandle>,
    progress_handle: Option<ProgressHandle>,
    last_current: Option<usize>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            status: PlayerStatus::default(),
            progress: ProgressReport::default(),
            selected: 0,
            selected_band: 0,
            mode: InputMode::Normal,
            input: String::new(),
            message: None,
            follow_playback: true,
            status_handle: None,
            progress_handle: None,
            last_current: None,
        }
    }

    /// Attach the controller's status snapshot.
    pub fn set_status_handle(&mut self, h: StatusHandle) {
        self.status_handle = Some(h);
    }

    /// Attach the progress monitor's report slot.
    pub fn set_progress_handle(&mut self, h: ProgressHandle) {
        self.progress_handle = Some(h);
    }

    /// Pull fresh snapshots from the attached handles.
    pub fn refresh(&mut self) {
        let status = self
            .status_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|st| st.clone()));
        let progress = self
            .progress_handle
            .as_ref()
            .and_then(|h| h.lock().ok().and_then(|slot| *slot))
            .unwrap_or_default();
        if let Some(status) = status {
            self.apply_snapshot(status, progress);
        }
    }

    /// Replace the shown snapshot and keep the cursors inside it.
    pub fn apply_snapshot(&mut self, status: PlayerStatus, progress: ProgressReport) {
        if let Some(err) = &status.last_error {
            self.message = Some(err.clone());
        }

        if status.current != self.last_current {
            if let (true, Some(idx)) = (self.follow_playback, status.current) {
                self.selected = idx;
            }
            self.last_current = status.current;
        }

        self.status = status;
        self.progress = progress;

        let len = self.track_count();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn track_count(&self) -> usize {
        self.status.playlist.len()
    }

    pub fn has_tracks(&self) -> bool {
        self.track_count() > 0
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.status.state,
            PlaybackState::Playing | PlaybackState::Paused
        )
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move selection to the next track. Wraps around to the first.
    pub fn next(&mut self) {
        let len = self.track_count();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track. Wraps around to the last.
    pub fn prev(&mut self) {
        let len = self.track_count();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn next_band(&mut self) {
        self.selected_band = (self.selected_band + 1) % BAND_COUNT;
    }

    pub fn prev_band(&mut self) {
        self.selected_band = (self.selected_band + BAND_COUNT - 1) % BAND_COUNT;
    }

    /// Gain the selected band currently has, per the last snapshot.
    pub fn selected_gain(&self) -> f32 {
        self.status
            .gains
            .get(self.selected_band)
            .copied()
            .unwrap_or(0.0)
    }

    /// Volume after a step of `delta`, kept in `0.0..=1.0`.
    pub fn stepped_volume(&self, delta: f32) -> f32 {
        (self.status.volume + delta).clamp(0.0, 1.0)
    }

    /// Gain of the selected band after a step of `delta` dB.
    pub fn stepped_gain(&self, delta: f32) -> f32 {
        (self.selected_gain() + delta).clamp(MIN_GAIN_DB, MAX_GAIN_DB)
    }

    pub fn enter_add_path(&mut self) {
        self.mode = InputMode::AddPath;
        self.input.clear();
    }

    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Leave the prompt and return the typed path, if any.
    ///
    /// A leading `~/` is expanded against `$HOME`.
    pub fn take_input(&mut self) -> Option<PathBuf> {
        self.mode = InputMode::Normal;
        let raw = std::mem::take(&mut self.input);
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match (raw.strip_prefix("~/"), std::env::var_os("HOME")) {
            (Some(rest), Some(home)) => Some(PathBuf::from(home).join(rest)),
            _ => Some(PathBuf::from(raw)),
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }
}
