//! Playlist controller: the only place that decides what is loaded.
//!
//! Owns the playlist, the current index, the single `PlaybackSession` and the
//! shared volume/equalizer state. Every transition tears the old session down
//! completely before the next one is built.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::config::{LibrarySettings, Settings};
use crate::error::{PlayerError, Result};
use crate::library::{Track, display_name, expand_paths, is_audio_file, read_tags};

use super::backend::AudioBackend;
use super::equalizer::{Equalizer, EqualizerHandle};
use super::session::{PlaybackSession, SessionParams};
use super::source::AudioSource;
use super::types::{
    AudioCmd, PlaybackState, PlayerStatus, PlaylistEntry, ProgressHandle,
};

pub struct PlaylistController<B: AudioBackend> {
    backend: B,
    tracks: Vec<Track>,
    current: Option<usize>,
    session: Option<PlaybackSession>,
    state: PlaybackState,
    volume: f32,
    equalizer: EqualizerHandle,
    progress: ProgressHandle,
    events: Sender<AudioCmd>,
    poll_interval: Duration,
    library: LibrarySettings,
    next_session_id: u64,
}

impl<B: AudioBackend> PlaylistController<B> {
    /// `events` is the sender side of the channel monitors post `TrackFinished` to.
    pub fn new(
        backend: B,
        events: Sender<AudioCmd>,
        progress: ProgressHandle,
        settings: &Settings,
    ) -> Self {
        Self {
            backend,
            tracks: Vec::new(),
            current: None,
            session: None,
            state: PlaybackState::Idle,
            volume: clamp_volume(settings.audio.volume, 1.0),
            equalizer: Arc::new(RwLock::new(Equalizer::from_gains(&settings.equalizer.gains))),
            progress,
            events,
            poll_interval: Duration::from_millis(settings.audio.poll_interval_ms.max(1)),
            library: settings.library.clone(),
            next_session_id: 1,
        }
    }

    // --- admission -------------------------------------------------------

    /// Add `path` to the playlist if it is a playable track.
    ///
    /// Never fails: unplayable files are logged and left out.
    pub fn admit(&mut self, path: &Path) -> bool {
        match self.inspect(path) {
            Ok(track) => {
                tracing::debug!(path = %path.display(), "admitted");
                self.tracks.push(track);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected");
                false
            }
        }
    }

    /// Admit files and walk directories. Returns how many tracks were added.
    pub fn admit_files(&mut self, paths: &[PathBuf]) -> usize {
        let candidates = expand_paths(paths, &self.library);
        let admitted = candidates.iter().filter(|p| self.admit(p)).count();
        tracing::info!(
            admitted,
            rejected = candidates.len() - admitted,
            "admission finished"
        );
        admitted
    }

    fn inspect(&mut self, path: &Path) -> Result<Track> {
        let invalid = |reason: String| PlayerError::InvalidFile {
            path: path.to_path_buf(),
            reason,
        };
        if !is_audio_file(path) {
            return Err(invalid("unsupported extension".to_string()));
        }

        let stream = self
            .backend
            .open_stream(path)
            .map_err(|e| invalid(e.to_string()))?;
        let source = AudioSource::open(stream).map_err(|e| invalid(e.to_string()))?;
        let (format, duration) = (source.format(), source.length());
        source.dispose();

        let tags = read_tags(path);
        let display = display_name(path, &tags);
        Ok(Track {
            path: path.to_path_buf(),
            format,
            duration,
            tags,
            display,
        })
    }

    /// Stop playback and empty the playlist.
    pub fn clear(&mut self) {
        self.stop();
        self.tracks.clear();
        self.current = None;
        self.state = PlaybackState::Idle;
    }

    // --- transport -------------------------------------------------------

    pub fn select_and_play(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlayerError::InvalidIndex {
                index,
                len: self.tracks.len(),
            });
        }
        self.load(index)
    }

    /// Replace the current session with a fresh one playing `index`.
    ///
    /// On failure the controller is left `Idle` with no session and the
    /// current index untouched.
    fn load(&mut self, index: usize) -> Result<()> {
        self.teardown_session();
        self.state = PlaybackState::Loading;

        let id = self.next_session_id;
        self.next_session_id += 1;

        let path = self.tracks[index].path.clone();
        let params = SessionParams {
            id,
            index,
            equalizer: &self.equalizer,
            volume: self.volume,
            progress: &self.progress,
            events: &self.events,
            poll_interval: self.poll_interval,
        };

        match PlaybackSession::start(&mut self.backend, &path, params) {
            Ok(session) => {
                tracing::info!(session = id, index, path = %path.display(), "playing");
                self.session = Some(session);
                self.current = Some(index);
                self.state = PlaybackState::Playing;
                Ok(())
            }
            Err(e) => {
                tracing::error!(index, path = %path.display(), error = %e, "failed to load track");
                self.state = PlaybackState::Idle;
                Err(e)
            }
        }
    }

    fn teardown_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.teardown() {
                tracing::error!(session = session.id(), error = %e, "session teardown failed");
            }
        }
        if let Ok(mut slot) = self.progress.lock() {
            *slot = None;
        }
    }

    /// Toggle between playing and paused. No-op without a session.
    pub fn play_pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_playing() {
            session.pause();
        } else {
            session.play();
        }
        self.state = session.state();
    }

    /// Advance to the next track. Returns `false` at the end of the playlist.
    pub fn next(&mut self) -> Result<bool> {
        match self.current {
            Some(cur) if cur + 1 < self.tracks.len() => self.load(cur + 1).map(|_| true),
            _ => Ok(false),
        }
    }

    /// Go back one track. Returns `false` at the start of the playlist.
    pub fn prev(&mut self) -> Result<bool> {
        match self.current {
            Some(cur) if cur > 0 => self.load(cur - 1).map(|_| true),
            _ => Ok(false),
        }
    }

    /// Stop playback without advancing. Idempotent.
    pub fn stop(&mut self) {
        self.teardown_session();
        self.state = PlaybackState::Stopped;
    }

    /// Handle the end-of-track notice posted by a progress monitor.
    ///
    /// Notices from sessions that were already replaced are ignored. At the end
    /// of the playlist playback stops.
    pub fn handle_track_finished(&mut self, session_id: u64) -> Result<()> {
        if self.session.as_ref().map(PlaybackSession::id) != Some(session_id) {
            tracing::debug!(session = session_id, "ignoring stale track-finished notice");
            return Ok(());
        }
        if !self.next()? {
            tracing::info!("end of playlist");
            self.stop();
        }
        Ok(())
    }

    // --- volume & equalizer ---------------------------------------------

    /// Set the output volume, clamped to `0.0..=1.0`. Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = clamp_volume(volume, self.volume);
        if let Some(session) = &self.session {
            session.set_volume(self.volume);
        }
        self.volume
    }

    /// Set one band's gain (clamped to +/-12 dB) and restart the current track
    /// so the new table applies from a clean start.
    ///
    /// Returns the stored gain, or `None` for an unknown band.
    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) -> Result<Option<f32>> {
        let stored = match self.equalizer.write() {
            Ok(mut eq) => eq.set_gain(band, gain_db),
            Err(poisoned) => poisoned.into_inner().set_gain(band, gain_db),
        };
        if stored.is_some() {
            if let Some(index) = self.session.as_ref().map(PlaybackSession::index) {
                self.load(index)?;
            }
        }
        Ok(stored)
    }

    // --- queries ---------------------------------------------------------

    pub fn gains(&self) -> Vec<f32> {
        match self.equalizer.read() {
            Ok(eq) => eq.gains(),
            Err(poisoned) => poisoned.into_inner().gains(),
        }
    }

    pub fn playlist(&self) -> Vec<PlaylistEntry> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(index, t)| PlaylistEntry {
                index,
                title: t.title(),
                display: t.display.clone(),
                duration_secs: t.duration.as_secs(),
                is_current: self.current == Some(index),
                format: t.format,
                tags: t.tags.clone(),
            })
            .collect()
    }

    pub fn status(&self, last_error: Option<String>) -> PlayerStatus {
        PlayerStatus {
            state: self.state,
            current: self.current,
            volume: self.volume,
            gains: self.gains(),
            playlist: self.playlist(),
            last_error,
        }
    }
}

#[cfg(test)]
impl<B: AudioBackend> PlaylistController<B> {
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(PlaybackSession::id)
    }

    pub fn has_monitor(&self) -> bool {
        self.session.as_ref().is_some_and(PlaybackSession::has_monitor)
    }

    /// Latest monitor report, or zeros when nothing is playing.
    pub fn progress(&self) -> super::types::ProgressReport {
        self.progress
            .lock()
            .ok()
            .and_then(|slot| *slot)
            .unwrap_or_default()
    }
}

fn clamp_volume(volume: f32, fallback: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
