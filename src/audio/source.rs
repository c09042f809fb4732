//! Decoded sample streams and the position-tracking `AudioSource` around them.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{PlayerError, Result};
use crate::library::TrackFormat;

/// A decoded, interleaved `f32` PCM stream as produced by a decoder.
pub trait SampleStream: Send {
    fn channels(&self) -> u16;
    fn sample_rate(&self) -> u32;
    fn bit_depth(&self) -> Option<u8> {
        None
    }
    /// Total duration, if the decoder or container can tell.
    fn total_duration(&self) -> Option<Duration>;
    /// Fill `buf` from the stream. Returns the number of samples written; 0 at end of stream.
    fn read(&mut self, buf: &mut [f32]) -> Result<usize>;
}

struct SourceState {
    stream: Option<Box<dyn SampleStream>>,
    samples_read: u64,
}

/// Read side of an `AudioSource`, shared with the gain pipeline and the progress monitor.
#[derive(Clone)]
pub struct SourceReader {
    state: Arc<Mutex<SourceState>>,
    format: TrackFormat,
    length: Duration,
}

impl SourceReader {
    fn lock(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// Read up to `buf.len()` samples. Fails with `SourceDisposed` once the source is gone.
    pub fn read(&self, buf: &mut [f32]) -> Result<usize> {
        let mut st = self.lock();
        let stream = st.stream.as_mut().ok_or(PlayerError::SourceDisposed)?;
        let n = stream.read(buf)?;
        st.samples_read += n as u64;
        Ok(n)
    }

    /// Playback position derived from the number of samples handed downstream.
    pub fn position(&self) -> Result<Duration> {
        let st = self.lock();
        if st.stream.is_none() {
            return Err(PlayerError::SourceDisposed);
        }
        Ok(samples_to_duration(st.samples_read, self.format))
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        self.lock().stream.is_none()
    }
}

/// A decoded track opened for playback. Owned by exactly one session.
pub struct AudioSource {
    reader: SourceReader,
}

impl AudioSource {
    /// Wrap a decoded stream. Streams with no channels, no sample rate or a
    /// zero/unknown duration are not playable.
    pub fn open(stream: Box<dyn SampleStream>) -> Result<Self> {
        let channels = stream.channels();
        let sample_rate = stream.sample_rate();
        if channels == 0 || sample_rate == 0 {
            return Err(PlayerError::Decode(format!(
                "unusable stream format ({channels} channels @ {sample_rate} Hz)"
            )));
        }
        let length = match stream.total_duration() {
            Some(d) if !d.is_zero() => d,
            _ => return Err(PlayerError::Decode("stream has no duration".to_string())),
        };
        let format = TrackFormat {
            sample_rate,
            channels,
            bit_depth: stream.bit_depth(),
        };

        Ok(Self {
            reader: SourceReader {
                state: Arc::new(Mutex::new(SourceState {
                    stream: Some(stream),
                    samples_read: 0,
                })),
                format,
                length,
            },
        })
    }

    pub fn reader(&self) -> SourceReader {
        self.reader.clone()
    }

    pub fn format(&self) -> TrackFormat {
        self.reader.format
    }

    pub fn length(&self) -> Duration {
        self.reader.length
    }

    #[cfg(test)]
    pub fn position(&self) -> Result<Duration> {
        self.reader.position()
    }

    /// Release the decoder and its file handle. Safe to call more than once.
    pub fn dispose(&self) {
        let stream = self.reader.lock().stream.take();
        drop(stream);
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        self.reader.is_disposed()
    }
}

fn samples_to_duration(samples: u64, format: TrackFormat) -> Duration {
    let frames = samples / u64::from(format.channels.max(1));
    let nanos = u128::from(frames) * 1_000_000_000 / u128::from(format.sample_rate.max(1));
    Duration::from_nanos(nanos as u64)
}
