//! Playback core: gain pipeline, sessions, progress monitoring and the
//! playlist controller, plus the thread that serializes commands to it.

mod backend;
mod controller;
mod equalizer;
mod monitor;
mod pipeline;
mod player;
mod session;
mod sink;
mod source;
mod thread;
mod types;

pub use backend::RodioBackend;
pub use equalizer::{BAND_COUNT, Equalizer, MAX_GAIN_DB, MIN_GAIN_DB};
pub use player::AudioPlayer;
pub use types::*;

#[cfg(test)]
mod testing;
