//! Gain stage between the decoded source and the sink.
//!
//! `GainPipeline::process` is the whole transform; `GainSource` only adapts it
//! to the pull-based `rodio::Source` interface the sink consumes.

use std::time::Duration;

use rodio::Source;

use crate::error::Result;

use super::equalizer::EqualizerHandle;
use super::source::SourceReader;

/// Frames pulled through the pipeline per block when feeding the sink.
const BLOCK_FRAMES: usize = 1024;

pub struct GainPipeline {
    source: SourceReader,
    equalizer: EqualizerHandle,
}

impl GainPipeline {
    pub fn new(source: SourceReader, equalizer: EqualizerHandle) -> Self {
        Self { source, equalizer }
    }

    pub fn channels(&self) -> u16 {
        self.source.format().channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.source.format().sample_rate
    }

    pub fn total_duration(&self) -> Duration {
        self.source.length()
    }

    /// Read up to `count` samples into `buffer[offset..]` and apply the band table.
    ///
    /// Returns the number of samples the source produced; short reads and end of
    /// stream (0) pass through unchanged. `count` is capped at the space left in
    /// `buffer`.
    pub fn process(&mut self, buffer: &mut [f32], offset: usize, count: usize) -> Result<usize> {
        let count = count.min(buffer.len().saturating_sub(offset));
        if count == 0 {
            return Ok(0);
        }

        let block = &mut buffer[offset..offset + count];
        let read = self.source.read(block)?;
        if read == 0 {
            return Ok(0);
        }

        // Read the live table once per block; edits land on the next block.
        let factors = match self.equalizer.read() {
            Ok(eq) => eq.linear_factors(),
            Err(poisoned) => poisoned.into_inner().linear_factors(),
        };
        apply_gains(&mut block[..read], &factors);
        Ok(read)
    }
}

/// Multiply every sample by each factor in order. No factors is identity.
pub fn apply_gains(samples: &mut [f32], factors: &[f32]) {
    if factors.is_empty() {
        return;
    }
    for sample in samples.iter_mut() {
        let mut s = *sample;
        for f in factors {
            s *= f;
        }
        *sample = s;
    }
}

/// `rodio::Source` view of a `GainPipeline`.
pub struct GainSource {
    pipeline: GainPipeline,
    block: Vec<f32>,
    pos: usize,
    len: usize,
    finished: bool,
}

impl GainSource {
    pub fn new(pipeline: GainPipeline) -> Self {
        let block_len = BLOCK_FRAMES * usize::from(pipeline.channels().max(1));
        Self {
            pipeline,
            block: vec![0.0; block_len],
            pos: 0,
            len: 0,
            finished: false,
        }
    }

    fn refill(&mut self) -> bool {
        let capacity = self.block.len();
        match self.pipeline.process(&mut self.block, 0, capacity) {
            Ok(0) => false,
            Ok(n) => {
                self.pos = 0;
                self.len = n;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "gain pipeline ended early");
                false
            }
        }
    }
}

impl Iterator for GainSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.len {
            if self.finished || !self.refill() {
                self.finished = true;
                return None;
            }
        }
        let sample = self.block[self.pos];
        self.pos += 1;
        Some(sample)
    }
}

impl Source for GainSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.pipeline.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.pipeline.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.pipeline.total_duration())
    }
}
