use std::path::PathBuf;
use std::time::Duration;

/// Decoded stream format reported by the decoder when a track is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFormat {
    pub sample_rate: u32,
    pub channels: u16,
    /// Container bit depth, when the format has one (lossy codecs don't).
    pub bit_depth: Option<u8>,
}

/// Tag fields read from the file; used for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub genres: Vec<String>,
    pub has_lyrics: bool,
    pub pictures: usize,
}

/// A playable track. Immutable once admitted to the playlist.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    pub format: TrackFormat,
    pub duration: Duration,
    pub tags: TrackTags,
    pub display: String,
}

impl Track {
    /// Title tag, or the file stem when the file carries none.
    pub fn title(&self) -> String {
        self.tags
            .title
            .clone()
            .or_else(|| {
                self.path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }
}
