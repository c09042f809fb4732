//! Audio-related small types and handles.
//!
//! This module defines the playback state machine states, the commands
//! accepted by the controller thread and the snapshots it shares with the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::{TrackFormat, TrackTags};

/// Controller-level playback state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No session exists.
    #[default]
    Idle,
    /// A session is being torn down and rebuilt.
    Loading,
    Playing,
    Paused,
    /// Playback was stopped explicitly or the playlist ran out.
    Stopped,
}

/// What the output sink reports about itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SinkState {
    Playing,
    Paused,
    /// Nothing left to play: the source ended or the sink was stopped.
    Stopped,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Admit files and directories into the playlist.
    Admit(Vec<PathBuf>),
    /// Stop playback and empty the playlist.
    Clear,
    /// Load and play the track at the given playlist index.
    SelectAndPlay(usize),
    /// Toggle pause/resume.
    PlayPause,
    /// Skip to the next track.
    Next,
    /// Go to the previous track.
    Prev,
    /// Set the output volume (clamped to `0.0..=1.0`).
    SetVolume(f32),
    /// Set one band's gain in dB (clamped to +/-12).
    SetBandGain(usize, f32),
    /// Stop playback without advancing.
    Stop,
    /// Posted by the progress monitor of the given session when its sink ran dry.
    TrackFinished(u64),
    /// Stop playback and shut the controller thread down.
    Quit,
}

/// Progress of the current session, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressReport {
    pub elapsed_secs: u64,
    pub total_secs: u64,
    /// `100 * position / length`, 0 when the length is unknown.
    pub percent: f64,
}

impl ProgressReport {
    pub fn compute(position: Duration, length: Duration) -> Self {
        let percent = if length.is_zero() {
            0.0
        } else {
            (100.0 * position.as_secs_f64() / length.as_secs_f64()).clamp(0.0, 100.0)
        };
        Self {
            elapsed_secs: position.as_secs(),
            total_secs: length.as_secs(),
            percent,
        }
    }
}

/// One playlist row as shown by the front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub index: usize,
    /// Title tag, falling back to the file stem.
    pub title: String,
    pub display: String,
    pub duration_secs: u64,
    pub is_current: bool,
    pub format: TrackFormat,
    pub tags: TrackTags,
}

/// Snapshot of the controller published after every command.
#[derive(Debug, Clone, Default)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    pub current: Option<usize>,
    pub volume: f32,
    pub gains: Vec<f32>,
    pub playlist: Vec<PlaylistEntry>,
    /// Message of the most recent failed command, cleared by the next one that succeeds.
    pub last_error: Option<String>,
}

pub type StatusHandle = Arc<Mutex<PlayerStatus>>;
pub type ProgressHandle = Arc<Mutex<Option<ProgressReport>>>;
