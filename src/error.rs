//! Error types shared by the player core.
//!
//! Every failure the playback core can report is a `PlayerError`. Admission
//! failures never leave the library module, monitor failures never leave the
//! monitor thread; the rest surface through the controller.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    /// The file failed the extension or decode check and is not a playable track.
    #[error("not a playable track: {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    /// The decoder could not open or read the stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// The output device could not be opened or written.
    #[error("audio output error: {0}")]
    Sink(String),

    /// A single progress poll failed; the monitor keeps running.
    #[error("progress monitor error: {0}")]
    TransientMonitor(String),

    /// A session resource could not be released cleanly.
    #[error("teardown error: {0}")]
    FatalTeardown(String),

    /// The audio source was read after it was disposed.
    #[error("audio source already disposed")]
    SourceDisposed,

    /// A playlist index outside `0..len` was requested.
    #[error("playlist index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
