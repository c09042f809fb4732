use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioPlayer, RodioBackend};
use crate::config::{self, LibrarySettings};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    let log_file = logging::init_logging(&settings.logging);
    if let Some(reason) = fallback {
        tracing::warn!(%reason, "using default settings");
    }
    tracing::info!(log_file = ?log_file, "starting");

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    let paths = startup_paths(args, &settings.library);

    let audio_player = AudioPlayer::spawn(RodioBackend::open_default, settings.clone());
    if !paths.is_empty() {
        audio_player.admit_files(paths);
    }

    let mut app = App::new();
    app.set_status_handle(audio_player.status_handle());
    app.set_progress_handle(audio_player.progress_handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &audio_player);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    audio_player.stop_and_exit();
    tracing::info!("bye");
    run_result
}

/// Command-line paths, or the music directory when none were given.
fn startup_paths(args: Vec<PathBuf>, library: &LibrarySettings) -> Vec<PathBuf> {
    if !args.is_empty() {
        return args;
    }
    library
        .music_dir
        .clone()
        .or_else(config::default_music_dir)
        .filter(|dir| dir.is_dir())
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win_over_music_dir() {
        let dir = tempfile::tempdir().unwrap();
        let library = LibrarySettings {
            music_dir: Some(dir.path().to_path_buf()),
            ..LibrarySettings::default()
        };

        let args = vec![PathBuf::from("/tmp/a.mp3")];
        assert_eq!(startup_paths(args.clone(), &library), args);
        assert_eq!(startup_paths(Vec::new(), &library), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn missing_music_dir_yields_nothing() {
        let library = LibrarySettings {
            music_dir: Some(PathBuf::from("/definitely/not/here")),
            ..LibrarySettings::default()
        };
        assert!(startup_paths(Vec::new(), &library).is_empty());
    }
}
