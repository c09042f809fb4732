//! Track model, tag reading and admission candidates.
//!
//! Files reach the playlist through `expand_paths` (directory walking) and the
//! controller's admission check; `read_tags` only feeds the display.

mod display;
mod model;
mod scan;
mod tags;

pub use display::display_name;
pub use model::{Track, TrackFormat, TrackTags};
pub use scan::{expand_paths, is_audio_file};
pub use tags::{read_container_info, read_tags};

#[cfg(test)]
mod tests;
