//! Decoder and device collaborators.
//!
//! `AudioBackend` is what the controller uses to turn a path into a decoded
//! stream and a pipeline into a playing sink. `RodioBackend` is the real one:
//! it owns the output stream and must live on the thread that opened it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Source};

use crate::error::{PlayerError, Result};
use crate::library::read_container_info;

use super::pipeline::GainPipeline;
use super::sink::{RodioSink, SharedSink};
use super::source::SampleStream;

pub trait AudioBackend {
    fn open_stream(&mut self, path: &Path) -> Result<Box<dyn SampleStream>>;
    fn open_sink(&mut self, pipeline: GainPipeline) -> Result<SharedSink>;
}

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::Sink(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when OutputStream is dropped, which tears through the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    fn open_stream(&mut self, path: &Path) -> Result<Box<dyn SampleStream>> {
        let file = File::open(path)
            .map_err(|e| PlayerError::Decode(format!("{}: {e}", path.display())))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| PlayerError::Decode(format!("{}: {e}", path.display())))?;

        // Some decoders can't size VBR streams; the container usually can.
        let info = read_container_info(path);
        let duration = decoder.total_duration().or(info.duration);

        Ok(Box::new(DecodedStream {
            decoder,
            duration,
            bit_depth: info.bit_depth,
        }))
    }

    fn open_sink(&mut self, pipeline: GainPipeline) -> Result<SharedSink> {
        Ok(Arc::new(RodioSink::new(self.stream.mixer(), pipeline)))
    }
}

struct DecodedStream {
    decoder: Decoder<BufReader<File>>,
    duration: Option<Duration>,
    bit_depth: Option<u8>,
}

impl SampleStream for DecodedStream {
    fn channels(&self) -> u16 {
        self.decoder.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.decoder.sample_rate()
    }

    fn bit_depth(&self) -> Option<u8> {
        self.bit_depth
    }

    fn total_duration(&self) -> Option<Duration> {
        self.duration
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        for (i, slot) in buf.iter_mut().enumerate() {
            match self.decoder.next() {
                Some(sample) => *slot = sample,
                None => return Ok(i),
            }
        }
        Ok(buf.len())
    }
}
