use std::path::Path;

use super::model::TrackTags;

/// Build the playlist line for a track: `Artist - Title`, falling back to the
/// title tag and then to the file stem.
pub fn display_name(path: &Path, tags: &TrackTags) -> String {
    let title = tags.title.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");
    let title = title.unwrap_or(stem);

    match tags.artist.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => format!("{a} - {title}"),
        _ => title.to_string(),
    }
}
