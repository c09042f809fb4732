//! Output sinks.
//!
//! The session talks to its sink through `OutputSink` so the progress monitor
//! can poll it from another thread; `RodioSink` wraps a `rodio::Sink` connected
//! to the output stream's mixer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rodio::Sink;
use rodio::mixer::Mixer;

use super::pipeline::{GainPipeline, GainSource};
use super::types::SinkState;

pub trait OutputSink: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, volume: f32);
    fn state(&self) -> SinkState;
    /// Release the device side of the sink. Safe to call more than once.
    fn dispose(&self);
}

pub type SharedSink = Arc<dyn OutputSink>;

pub struct RodioSink {
    sink: Sink,
    disposed: AtomicBool,
}

impl RodioSink {
    /// Create a paused sink on `mixer` fed by `pipeline`.
    pub(super) fn new(mixer: &Mixer, pipeline: GainPipeline) -> Self {
        let sink = Sink::connect_new(mixer);
        sink.append(GainSource::new(pipeline));
        sink.pause();
        Self {
            sink,
            disposed: AtomicBool::new(false),
        }
    }
}

impl OutputSink for RodioSink {
    fn play(&self) {
        self.sink.play();
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn state(&self) -> SinkState {
        if self.disposed.load(Ordering::Acquire) || self.sink.empty() {
            SinkState::Stopped
        } else if self.sink.is_paused() {
            SinkState::Paused
        } else {
            SinkState::Playing
        }
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            self.sink.stop();
            self.sink.clear();
        }
    }
}
