//! In-memory backend for exercising sessions and the controller without a device.
//!
//! File names drive behavior: `corrupt` fails to decode, `silent` has no
//! duration, anything else is one second of 8 kHz stereo at a constant level.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{PlayerError, Result};

use super::backend::AudioBackend;
use super::pipeline::GainPipeline;
use super::sink::{OutputSink, SharedSink};
use super::source::SampleStream;
use super::types::SinkState;

pub const FAKE_RATE: u32 = 8_000;
pub const FAKE_CHANNELS: u16 = 2;

#[derive(Default)]
struct FakeShared {
    open_streams: AtomicUsize,
    open_sinks: AtomicUsize,
    fail_open: AtomicBool,
    fail_sink: AtomicBool,
    sinks: Mutex<Vec<Arc<FakeSink>>>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    shared: Arc<FakeShared>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_streams(&self) -> usize {
        self.shared.open_streams.load(Ordering::SeqCst)
    }

    pub fn open_sinks(&self) -> usize {
        self.shared.open_sinks.load(Ordering::SeqCst)
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.shared.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_sink(&self, fail: bool) {
        self.shared.fail_sink.store(fail, Ordering::SeqCst);
    }

    /// Every sink ever opened, oldest first.
    pub fn sinks(&self) -> Vec<Arc<FakeSink>> {
        self.shared.sinks.lock().unwrap().clone()
    }

    pub fn last_sink(&self) -> Arc<FakeSink> {
        self.sinks().last().cloned().expect("no sink opened yet")
    }
}

impl AudioBackend for FakeBackend {
    fn open_stream(&mut self, path: &Path) -> Result<Box<dyn SampleStream>> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if self.shared.fail_open.load(Ordering::SeqCst) || name.contains("corrupt") {
            return Err(PlayerError::Decode(format!("{}: bad data", path.display())));
        }
        let duration = if name.contains("silent") {
            Some(Duration::ZERO)
        } else {
            Some(Duration::from_secs(1))
        };

        self.shared.open_streams.fetch_add(1, Ordering::SeqCst);
        let samples = (FAKE_RATE as usize) * usize::from(FAKE_CHANNELS);
        let mut stream = FakeStream::constant(0.5, samples);
        stream.duration = duration;
        stream.shared = Some(self.shared.clone());
        Ok(Box::new(stream))
    }

    fn open_sink(&mut self, pipeline: GainPipeline) -> Result<SharedSink> {
        if self.shared.fail_sink.load(Ordering::SeqCst) {
            return Err(PlayerError::Sink("device busy".to_string()));
        }
        self.shared.open_sinks.fetch_add(1, Ordering::SeqCst);
        let sink = Arc::new(FakeSink {
            state: Mutex::new(SinkState::Paused),
            volume: Mutex::new(1.0),
            disposed: AtomicBool::new(false),
            polled_after_dispose: AtomicBool::new(false),
            pipeline: Mutex::new(Some(pipeline)),
            shared: self.shared.clone(),
        });
        self.shared.sinks.lock().unwrap().push(sink.clone());
        Ok(sink)
    }
}

/// A stream of `remaining` identical samples.
pub struct FakeStream {
    remaining: usize,
    value: f32,
    pub channels: u16,
    pub sample_rate: u32,
    pub duration: Option<Duration>,
    shared: Option<Arc<FakeShared>>,
}

impl FakeStream {
    pub fn constant(value: f32, samples: usize) -> Self {
        Self {
            remaining: samples,
            value,
            channels: FAKE_CHANNELS,
            sample_rate: FAKE_RATE,
            duration: Some(Duration::from_secs(1)),
            shared: None,
        }
    }
}

impl SampleStream for FakeStream {
    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        self.duration
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        let n = buf.len().min(self.remaining);
        buf[..n].fill(self.value);
        self.remaining -= n;
        Ok(n)
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        if let Some(shared) = &self.shared {
            shared.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

pub struct FakeSink {
    state: Mutex<SinkState>,
    volume: Mutex<f32>,
    disposed: AtomicBool,
    polled_after_dispose: AtomicBool,
    pipeline: Mutex<Option<GainPipeline>>,
    shared: Arc<FakeShared>,
}

impl FakeSink {
    /// Simulate the source running dry.
    pub fn finish(&self) {
        *self.state.lock().unwrap() = SinkState::Stopped;
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }

    pub fn current_state(&self) -> SinkState {
        *self.state.lock().unwrap()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn polled_after_dispose(&self) -> bool {
        self.polled_after_dispose.load(Ordering::SeqCst)
    }

    /// Drain up to `samples` through the sink's pipeline, as the device would.
    pub fn pull(&self, samples: usize) -> usize {
        let mut guard = self.pipeline.lock().unwrap();
        let Some(pipeline) = guard.as_mut() else {
            return 0;
        };
        let mut buf = vec![0.0f32; samples];
        let mut done = 0;
        while done < samples {
            match pipeline.process(&mut buf, done, samples - done) {
                Ok(0) | Err(_) => break,
                Ok(n) => done += n,
            }
        }
        done
    }
}

impl OutputSink for FakeSink {
    fn play(&self) {
        let mut st = self.state.lock().unwrap();
        if *st != SinkState::Stopped {
            *st = SinkState::Playing;
        }
    }

    fn pause(&self) {
        let mut st = self.state.lock().unwrap();
        if *st != SinkState::Stopped {
            *st = SinkState::Paused;
        }
    }

    fn stop(&self) {
        *self.state.lock().unwrap() = SinkState::Stopped;
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
    }

    fn state(&self) -> SinkState {
        if self.is_disposed() {
            self.polled_after_dispose.store(true, Ordering::SeqCst);
        }
        self.current_state()
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.pipeline.lock().unwrap().take();
            self.shared.open_sinks.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
