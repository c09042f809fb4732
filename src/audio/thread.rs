use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::config::Settings;
use crate::error::Result;

use super::backend::AudioBackend;
use super::controller::PlaylistController;
use super::types::{AudioCmd, ProgressHandle, StatusHandle};

/// Run the playlist controller on its own thread.
///
/// The backend is built on that thread: the rodio output stream has to stay on
/// the thread that opened it. Commands are handled strictly one at a time and a
/// fresh `PlayerStatus` is published after each.
pub(super) fn spawn_controller_thread<F, B>(
    make_backend: F,
    rx: Receiver<AudioCmd>,
    events: Sender<AudioCmd>,
    status: StatusHandle,
    progress: ProgressHandle,
    settings: Settings,
) -> JoinHandle<()>
where
    F: FnOnce() -> Result<B> + Send + 'static,
    B: AudioBackend + 'static,
{
    thread::spawn(move || {
        let backend = match make_backend() {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "audio backend unavailable");
                if let Ok(mut st) = status.lock() {
                    st.last_error = Some(e.to_string());
                }
                return;
            }
        };

        let mut controller = PlaylistController::new(backend, events, progress, &settings);
        publish(&controller, &status, None);

        while let Ok(cmd) = rx.recv() {
            let quit = matches!(cmd, AudioCmd::Quit);
            let outcome = dispatch(&mut controller, cmd);
            publish(&controller, &status, outcome.err().map(|e| e.to_string()));
            if quit {
                break;
            }
        }

        controller.stop();
        publish(&controller, &status, None);
    })
}

fn dispatch<B: AudioBackend>(controller: &mut PlaylistController<B>, cmd: AudioCmd) -> Result<()> {
    match cmd {
        AudioCmd::Admit(paths) => {
            controller.admit_files(&paths);
        }
        AudioCmd::Clear => controller.clear(),
        AudioCmd::SelectAndPlay(i) => controller.select_and_play(i)?,
        AudioCmd::PlayPause => controller.play_pause(),
        AudioCmd::Next => {
            controller.next()?;
        }
        AudioCmd::Prev => {
            controller.prev()?;
        }
        AudioCmd::SetVolume(v) => {
            controller.set_volume(v);
        }
        AudioCmd::SetBandGain(band, gain) => {
            controller.set_band_gain(band, gain)?;
        }
        AudioCmd::Stop | AudioCmd::Quit => controller.stop(),
        AudioCmd::TrackFinished(session_id) => controller.handle_track_finished(session_id)?,
    }
    Ok(())
}

fn publish<B: AudioBackend>(
    controller: &PlaylistController<B>,
    status: &StatusHandle,
    last_error: Option<String>,
) {
    if let Ok(mut st) = status.lock() {
        *st = controller.status(last_error);
    }
}
