use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::Settings;
use crate::error::Result;

use super::backend::AudioBackend;
use super::thread::spawn_controller_thread;
use super::types::{AudioCmd, PlayerStatus, ProgressHandle, StatusHandle};

/// Front-end handle to the controller thread: the command surface plus the
/// shared status and progress snapshots.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    status: StatusHandle,
    progress: ProgressHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn spawn<F, B>(make_backend: F, settings: Settings) -> Self
    where
        F: FnOnce() -> Result<B> + Send + 'static,
        B: AudioBackend + 'static,
    {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let status: StatusHandle = Arc::new(Mutex::new(PlayerStatus::default()));
        let progress: ProgressHandle = Arc::new(Mutex::new(None));

        let join = spawn_controller_thread(
            make_backend,
            rx,
            tx.clone(),
            status.clone(),
            progress.clone(),
            settings,
        );

        Self {
            tx,
            status,
            progress,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn progress_handle(&self) -> ProgressHandle {
        self.progress.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> std::result::Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Copy of the latest published controller status.
    #[cfg(test)]
    pub fn status(&self) -> PlayerStatus {
        self.status
            .lock()
            .map(|st| st.clone())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn progress(&self) -> super::types::ProgressReport {
        self.progress
            .lock()
            .ok()
            .and_then(|slot| *slot)
            .unwrap_or_default()
    }

    pub fn admit_files(&self, paths: Vec<PathBuf>) {
        let _ = self.send(AudioCmd::Admit(paths));
    }

    pub fn select_and_play(&self, index: usize) {
        let _ = self.send(AudioCmd::SelectAndPlay(index));
    }

    pub fn play_pause(&self) {
        let _ = self.send(AudioCmd::PlayPause);
    }

    pub fn next(&self) {
        let _ = self.send(AudioCmd::Next);
    }

    pub fn prev(&self) {
        let _ = self.send(AudioCmd::Prev);
    }

    pub fn stop(&self) {
        let _ = self.send(AudioCmd::Stop);
    }

    pub fn clear(&self) {
        let _ = self.send(AudioCmd::Clear);
    }

    pub fn set_volume(&self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }

    pub fn set_band_gain(&self, band: usize, gain_db: f32) {
        let _ = self.send(AudioCmd::SetBandGain(band, gain_db));
    }

    /// Stop playback, shut the controller thread down and wait for it.
    pub fn stop_and_exit(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop_and_exit();
    }
}
