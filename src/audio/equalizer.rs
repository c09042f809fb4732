//! The ten-band gain table.
//!
//! Each band carries a nominal center frequency, but the gain pipeline applies
//! every band to every sample: the table behaves as one flat gain made of ten
//! factors, not as a filter bank.

use std::sync::{Arc, RwLock};

pub const BAND_COUNT: usize = 10;

/// Nominal center frequencies in Hz, lowest band first.
pub const CENTER_FREQUENCIES: [f32; BAND_COUNT] = [
    60.0, 170.0, 310.0, 600.0, 1000.0, 3000.0, 6000.0, 12000.0, 14000.0, 16000.0,
];

pub const MIN_GAIN_DB: f32 = -12.0;
pub const MAX_GAIN_DB: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizerBand {
    pub frequency: f32,
    gain_db: f32,
}

impl EqualizerBand {
    pub fn new(frequency: f32, gain_db: f32) -> Self {
        let mut band = Self {
            frequency,
            gain_db: 0.0,
        };
        band.set_gain(gain_db);
        band
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Set the gain, clamped to `MIN_GAIN_DB..=MAX_GAIN_DB`. Non-finite input is ignored.
    /// Returns the gain actually stored.
    pub fn set_gain(&mut self, gain_db: f32) -> f32 {
        if gain_db.is_finite() {
            self.gain_db = gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB);
        }
        self.gain_db
    }

    /// Linear amplitude factor `10^(gain_db / 20)`.
    pub fn linear_gain(&self) -> f32 {
        10f32.powf(self.gain_db / 20.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Equalizer {
    bands: Vec<EqualizerBand>,
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::from_gains(&[0.0; BAND_COUNT])
    }
}

impl Equalizer {
    /// Build the canonical table from per-band gains. Missing gains default to
    /// 0 dB and extra values are ignored.
    pub fn from_gains(gains: &[f32]) -> Self {
        let bands = CENTER_FREQUENCIES
            .iter()
            .enumerate()
            .map(|(i, &f)| EqualizerBand::new(f, gains.get(i).copied().unwrap_or(0.0)))
            .collect();
        Self { bands }
    }

    /// A table with arbitrary bands, including none at all.
    #[cfg(test)]
    pub fn with_bands(bands: Vec<EqualizerBand>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[EqualizerBand] {
        &self.bands
    }

    pub fn gains(&self) -> Vec<f32> {
        self.bands.iter().map(EqualizerBand::gain_db).collect()
    }

    /// Set one band's gain. Returns the clamped gain, or `None` for an unknown band.
    pub fn set_gain(&mut self, index: usize, gain_db: f32) -> Option<f32> {
        self.bands.get_mut(index).map(|b| b.set_gain(gain_db))
    }

    /// Per-band linear factors in band order.
    pub fn linear_factors(&self) -> Vec<f32> {
        self.bands.iter().map(EqualizerBand::linear_gain).collect()
    }

    /// The single multiplier the whole table applies to a sample.
    pub fn combined_gain(&self) -> f32 {
        self.bands.iter().map(EqualizerBand::linear_gain).product()
    }
}

/// Shared table: written by the controller thread, read by the pipeline once per block.
pub type EqualizerHandle = Arc<RwLock<Equalizer>>;
