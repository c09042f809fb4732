use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::audio::{AudioPlayer, PlaybackState};
use crate::config;
use crate::ui;

/// Main terminal event loop: pulls controller snapshots, draws and turns key
/// presses into player commands. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.refresh();
        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> bool {
    if app.mode == InputMode::AddPath {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Enter => {
                if let Some(path) = app.take_input() {
                    app.set_message(format!("adding {}", path.display()));
                    audio_player.admit_files(vec![path]);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_input_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let ui = &settings.ui;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                app.follow_playback_on();
                app.message = None;
                audio_player.select_and_play(app.selected);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            // Nothing loaded yet: start the selected track instead.
            let loaded = !matches!(
                app.status.state,
                PlaybackState::Idle | PlaybackState::Stopped
            );
            if loaded {
                audio_player.play_pause();
            } else if app.has_tracks() {
                app.follow_playback_on();
                audio_player.select_and_play(app.selected);
            }
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            audio_player.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            audio_player.prev();
        }
        KeyCode::Char('s') => audio_player.stop(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            audio_player.set_volume(app.stepped_volume(ui.volume_step));
        }
        KeyCode::Char('-') => {
            audio_player.set_volume(app.stepped_volume(-ui.volume_step));
        }
        KeyCode::Tab => app.next_band(),
        KeyCode::BackTab => app.prev_band(),
        KeyCode::Char('u') => {
            audio_player.set_band_gain(app.selected_band, app.stepped_gain(ui.gain_step));
        }
        KeyCode::Char('d') => {
            audio_player.set_band_gain(app.selected_band, app.stepped_gain(-ui.gain_step));
        }
        KeyCode::Char('a') => app.enter_add_path(),
        KeyCode::Char('c') => {
            app.message = None;
            audio_player.clear();
        }
        _ => {}
    }

    false
}
