use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    foundation::error::{EarthwallError, EarthwallResult},
    poll::pipeline::Pipeline,
    state::status::DisplayStatus,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LoopState::Running => "Running",
            LoopState::Stopped => "Stopped",
        })
    }
}

struct Worker {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodic driver for a [`Pipeline`].
///
/// While running, a dedicated thread runs one cycle immediately and then one per interval.
/// Stopping waits for an in-flight cycle to finish; it is never interrupted midway.
pub struct PollLoop {
    pipeline: Arc<Pipeline>,
    interval: Duration,
    worker: Option<Worker>,
}

impl PollLoop {
    /// Create the loop in the running state.
    pub fn start(pipeline: Arc<Pipeline>, interval: Duration) -> EarthwallResult<Self> {
        if interval.is_zero() {
            return Err(EarthwallError::config("poll interval must be > 0"));
        }
        let mut this = Self {
            pipeline,
            interval,
            worker: None,
        };
        this.resume()?;
        Ok(this)
    }

    pub fn state(&self) -> LoopState {
        if self.worker.is_some() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stopped -> Running. Restarts the schedule with an immediate cycle. No-op when running.
    pub fn resume(&mut self) -> EarthwallResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let (stop_tx, stop_rx) = mpsc::channel();
        let pipeline = Arc::clone(&self.pipeline);
        let interval = self.interval;
        let handle = std::thread::Builder::new()
            .name("earthwall-poll".to_owned())
            .spawn(move || run_worker(&pipeline, interval, &stop_rx))
            .map_err(|e| anyhow::Error::new(e).context("spawn poll thread"))?;
        self.worker = Some(Worker { stop_tx, handle });
        tracing::info!(interval_ms = self.interval.as_millis(), "polling started");
        Ok(())
    }

    /// Running -> Stopped. Cancels the timer, waits for the current cycle and shows the idle
    /// status. No-op when stopped.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            tracing::error!("poll thread panicked");
        }
        self.pipeline.reporter().report(DisplayStatus::Idle);
        tracing::info!("polling stopped");
    }

    /// Flip between running and stopped, returning the new state.
    pub fn toggle(&mut self) -> EarthwallResult<LoopState> {
        match self.state() {
            LoopState::Running => self.stop(),
            LoopState::Stopped => self.resume()?,
        }
        Ok(self.state())
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(pipeline: &Pipeline, interval: Duration, stop_rx: &mpsc::Receiver<()>) {
    let mut next_tick = Instant::now();
    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let outcome = pipeline.run_cycle();
        tracing::debug!(%outcome, "cycle finished");

        // A cycle that overran its slot gets one catch-up tick, not a burst.
        next_tick += interval;
        let now = Instant::now();
        if next_tick < now {
            next_tick = now;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poll/poll_loop.rs"]
mod tests;
