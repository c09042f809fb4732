//! Tag and container-property reading through `lofty`.
//!
//! Nothing here is required for playback: a file without readable tags still
//! plays, it just shows its file name.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, ItemKey, TaggedFileExt};

use super::model::TrackTags;

/// Read display tags from `path`. Unreadable files yield empty tags.
pub fn read_tags(path: &Path) -> TrackTags {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return TrackTags::default();
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return TrackTags::default();
    };

    let mut tags = TrackTags {
        title: non_empty(tag.title().as_deref()),
        artist: non_empty(tag.artist().as_deref()),
        album: non_empty(tag.album().as_deref()),
        genres: tag
            .genre()
            .map(|g| split_genres(&g))
            .unwrap_or_default(),
        pictures: tag.pictures().len(),
        ..TrackTags::default()
    };

    for item in tag.items() {
        match item.key() {
            ItemKey::Lyrics => {
                tags.has_lyrics |= item.value().text().is_some_and(|t| !t.trim().is_empty());
            }
            ItemKey::Year | ItemKey::RecordingDate => {
                if tags.year.is_none() {
                    tags.year = item.value().text().and_then(parse_year);
                }
            }
            _ => {}
        }
    }

    tags
}

/// Container-level properties used when the decoder cannot report them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerInfo {
    pub duration: Option<Duration>,
    pub bit_depth: Option<u8>,
}

pub fn read_container_info(path: &Path) -> ContainerInfo {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let props = tagged.properties();
            let duration = props.duration();
            ContainerInfo {
                duration: (!duration.is_zero()).then_some(duration),
                bit_depth: props.bit_depth(),
            }
        }
        Err(_) => ContainerInfo::default(),
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Genre frames often pack several values; split on the usual separators.
pub(crate) fn split_genres(raw: &str) -> Vec<String> {
    raw.split([';', '/', '\0'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts `2019`, `2019-04-01` and similar date strings.
pub(crate) fn parse_year(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
