use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// File extensions the player will try to admit (lowercase, without dot).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "m4a", "wma", "aac"];

/// Extension check used by admission. Case-insensitive.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand `paths` into admission candidates.
///
/// Files are passed through as given (extension checks happen at admission so a
/// rejected file is still logged). Directories are walked according to
/// `settings`, keeping files with an allowed extension, sorted by path within
/// each directory argument.
pub fn expand_paths(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(scan_dir(path, settings));
        } else {
            out.push(path.clone());
        }
    }
    out
}

/// Walk `dir` and return the audio files it contains.
pub fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_allow_list_case_insensitive() {
        assert!(is_audio_file(Path::new("/tmp/a.mp3")));
        assert!(is_audio_file(Path::new("/tmp/a.MP3")));
        assert!(is_audio_file(Path::new("/tmp/a.Flac")));
        assert!(is_audio_file(Path::new("/tmp/a.wav")));
        assert!(is_audio_file(Path::new("/tmp/a.m4a")));
        assert!(is_audio_file(Path::new("/tmp/a.WMA")));
        assert!(is_audio_file(Path::new("/tmp/a.aac")));
        assert!(!is_audio_file(Path::new("/tmp/a.ogg")));
        assert!(!is_audio_file(Path::new("/tmp/track.txt")));
        assert!(!is_audio_file(Path::new("/tmp/a")));
    }

    #[test]
    fn scan_dir_filters_non_audio_and_sorts() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("a.flac"), b"not a real flac").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let files = scan_dir(dir.path(), &LibrarySettings::default());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.flac", "b.MP3"]);
    }

    #[test]
    fn scan_dir_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let files = scan_dir(dir.path(), &LibrarySettings::default());
        assert_eq!(files.len(), 1);

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_dir(dir.path(), &settings).len(), 2);
    }

    #[test]
    fn scan_dir_respects_recursive_false_and_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        let flat = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_dir(dir.path(), &flat).len(), 1);

        // WalkDir depth counts root as 0, so max_depth=2 reaches d1/* but not d1/d2/*.
        let capped = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let files = scan_dir(dir.path(), &capped);
        assert!(files.iter().any(|p| p.ends_with("d1/one.mp3")));
        assert!(!files.iter().any(|p| p.ends_with("two.mp3")));
    }

    #[test]
    fn expand_paths_keeps_files_in_order_and_walks_dirs() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("album");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("02.mp3"), b"x").unwrap();
        fs::write(sub.join("01.mp3"), b"x").unwrap();

        let loose = dir.path().join("notes.txt");
        let paths = vec![loose.clone(), sub.clone(), loose.clone()];
        let out = expand_paths(&paths, &LibrarySettings::default());
        assert_eq!(
            out,
            vec![loose.clone(), sub.join("01.mp3"), sub.join("02.mp3"), loose]
        );
    }
}
