//! Progress monitor: one polling thread per playback session.
//!
//! The monitor publishes a `ProgressReport` every tick and, when the sink runs
//! dry, posts `AudioCmd::TrackFinished` to the controller thread exactly once
//! and exits. It never touches the controller directly, so a session teardown
//! can always join it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{PlayerError, Result};

use super::sink::SharedSink;
use super::source::SourceReader;
use super::types::{AudioCmd, ProgressHandle, ProgressReport, SinkState};

/// Everything the monitor thread needs; moved into the thread.
pub struct MonitorContext {
    pub session_id: u64,
    pub source: SourceReader,
    pub sink: SharedSink,
    pub progress: ProgressHandle,
    pub events: Sender<AudioCmd>,
    pub interval: Duration,
}

/// Owning handle of a running monitor. Dropping it cancels and joins.
pub struct MonitorHandle {
    stop_tx: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the monitor to stop and wait for its thread to exit.
    ///
    /// After this returns the monitor holds no reference to the sink or source.
    pub fn cancel(&mut self) -> Result<()> {
        // Dropping the sender wakes `recv_timeout` with `Disconnected`.
        self.stop_tx.take();
        match self.join.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| PlayerError::FatalTeardown("progress monitor panicked".to_string())),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if let Err(e) = self.cancel() {
            tracing::error!(error = %e, "progress monitor did not shut down cleanly");
        }
    }
}

pub fn spawn_monitor(ctx: MonitorContext) -> MonitorHandle {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let join = thread::spawn(move || run(ctx, stop_rx));
    MonitorHandle {
        stop_tx: Some(stop_tx),
        join: Some(join),
    }
}

enum Tick {
    Continue,
    Finished,
}

fn run(ctx: MonitorContext, stop_rx: Receiver<()>) {
    tracing::debug!(session = ctx.session_id, "progress monitor started");
    loop {
        match stop_rx.recv_timeout(ctx.interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        match poll(&ctx) {
            Ok(Tick::Continue) => {}
            Ok(Tick::Finished) => {
                tracing::debug!(session = ctx.session_id, "track finished");
                if let Err(e) = ctx.events.send(AudioCmd::TrackFinished(ctx.session_id)) {
                    tracing::debug!(
                        session = ctx.session_id,
                        error = %e,
                        "controller gone; track-finished notice dropped"
                    );
                }
                break;
            }
            Err(PlayerError::SourceDisposed) => {
                tracing::debug!(session = ctx.session_id, "source disposed under monitor");
                break;
            }
            Err(e) => {
                tracing::warn!(session = ctx.session_id, error = %e, "progress poll failed");
            }
        }
    }
    tracing::debug!(session = ctx.session_id, "progress monitor stopped");
}

fn poll(ctx: &MonitorContext) -> Result<Tick> {
    if ctx.sink.state() == SinkState::Stopped {
        return Ok(Tick::Finished);
    }

    let report = ProgressReport::compute(ctx.source.position()?, ctx.source.length());
    match ctx.progress.lock() {
        Ok(mut slot) => {
            *slot = Some(report);
            Ok(Tick::Continue)
        }
        Err(_) => {
            ctx.progress.clear_poison();
            Err(PlayerError::TransientMonitor(
                "progress handle was poisoned".to_string(),
            ))
        }
    }
}
