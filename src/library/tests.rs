use super::display::display_name;
use super::model::{Track, TrackFormat, TrackTags};
use super::tags::{parse_year, read_tags, split_genres};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[test]
fn display_name_prefers_artist_dash_title() {
    let p = Path::new("/tmp/Song.mp3");
    let tags = TrackTags {
        title: Some("Song".into()),
        artist: Some("  Artist  ".into()),
        ..TrackTags::default()
    };
    assert_eq!(display_name(p, &tags), "Artist - Song");

    let no_artist = TrackTags {
        title: Some("Song".into()),
        ..TrackTags::default()
    };
    assert_eq!(display_name(p, &no_artist), "Song");
}

#[test]
fn display_name_falls_back_to_file_stem() {
    let p = Path::new("/music/01 Intro.flac");
    assert_eq!(display_name(p, &TrackTags::default()), "01 Intro");

    let blank = TrackTags {
        title: Some("   ".into()),
        artist: Some("".into()),
        ..TrackTags::default()
    };
    assert_eq!(display_name(p, &blank), "01 Intro");
}

#[test]
fn track_title_uses_tag_then_stem() {
    let mut t = Track {
        path: PathBuf::from("/music/b-side.mp3"),
        format: TrackFormat {
            sample_rate: 44_100,
            channels: 2,
            bit_depth: None,
        },
        duration: Duration::from_secs(10),
        tags: TrackTags::default(),
        display: String::new(),
    };
    assert_eq!(t.title(), "b-side");
    t.tags.title = Some("Real Title".into());
    assert_eq!(t.title(), "Real Title");
}

#[test]
fn read_tags_on_missing_file_is_empty() {
    let tags = read_tags(Path::new("/definitely/not/here.mp3"));
    assert_eq!(tags, TrackTags::default());
}

#[test]
fn genres_and_years_parse_loosely() {
    assert_eq!(split_genres("Rock; Jazz/Blues"), vec!["Rock", "Jazz", "Blues"]);
    assert!(split_genres(" ; ").is_empty());
    assert_eq!(parse_year("2019"), Some(2019));
    assert_eq!(parse_year("1999-04-01"), Some(1999));
    assert_eq!(parse_year("n/a"), None);
}
