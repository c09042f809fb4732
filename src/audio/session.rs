//! One track's worth of playback resources.
//!
//! A `PlaybackSession` owns the audio source, the sink (which owns the gain
//! pipeline) and the progress monitor bound to them. Teardown order is fixed:
//! monitor (cancelled and joined), then sink, then source.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::error::Result;

use super::backend::AudioBackend;
use super::equalizer::EqualizerHandle;
use super::monitor::{MonitorContext, MonitorHandle, spawn_monitor};
use super::pipeline::GainPipeline;
use super::sink::SharedSink;
use super::source::AudioSource;
use super::types::{AudioCmd, PlaybackState, ProgressHandle};

/// Inputs a session needs besides the track itself.
pub struct SessionParams<'a> {
    pub id: u64,
    pub index: usize,
    pub equalizer: &'a EqualizerHandle,
    pub volume: f32,
    pub progress: &'a ProgressHandle,
    pub events: &'a Sender<AudioCmd>,
    pub poll_interval: Duration,
}

pub struct PlaybackSession {
    id: u64,
    index: usize,
    source: AudioSource,
    sink: SharedSink,
    monitor: Option<MonitorHandle>,
    playing: bool,
    torn_down: bool,
}

impl PlaybackSession {
    /// Open `path`, start it playing and bind a fresh progress monitor.
    ///
    /// On failure everything opened so far is released before returning.
    pub fn start<B: AudioBackend>(
        backend: &mut B,
        path: &Path,
        params: SessionParams<'_>,
    ) -> Result<Self> {
        let stream = backend.open_stream(path)?;
        let source = AudioSource::open(stream)?;
        let pipeline = GainPipeline::new(source.reader(), params.equalizer.clone());

        let sink = match backend.open_sink(pipeline) {
            Ok(sink) => sink,
            Err(e) => {
                source.dispose();
                return Err(e);
            }
        };
        sink.set_volume(params.volume);
        sink.play();

        let monitor = spawn_monitor(MonitorContext {
            session_id: params.id,
            source: source.reader(),
            sink: sink.clone(),
            progress: params.progress.clone(),
            events: params.events.clone(),
            interval: params.poll_interval,
        });

        Ok(Self {
            id: params.id,
            index: params.index,
            source,
            sink,
            monitor: Some(monitor),
            playing: true,
            torn_down: false,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Playlist index of the track this session plays.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn state(&self) -> PlaybackState {
        if self.torn_down {
            PlaybackState::Stopped
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    #[cfg(test)]
    pub fn has_monitor(&self) -> bool {
        self.monitor.as_ref().is_some_and(MonitorHandle::is_running)
    }

    pub fn play(&mut self) {
        if !self.torn_down {
            self.sink.play();
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        if !self.torn_down {
            self.sink.pause();
            self.playing = false;
        }
    }

    pub fn set_volume(&self, volume: f32) {
        if !self.torn_down {
            self.sink.set_volume(volume);
        }
    }

    /// Release the session's resources. Idempotent.
    ///
    /// Sink and source are always released; a monitor that failed to shut down
    /// cleanly is reported as the error.
    pub fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        self.playing = false;

        let monitor_result = match self.monitor.take() {
            Some(mut monitor) => monitor.cancel(),
            None => Ok(()),
        };
        self.sink.stop();
        self.sink.dispose();
        self.source.dispose();
        monitor_result
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::error!(session = self.id, error = %e, "session teardown failed");
        }
    }
}
