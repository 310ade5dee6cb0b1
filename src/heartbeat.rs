//! Liveness heartbeat — logs periodically while the app runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

/// Time of the most recent beat, shared with the spawned task.
#[derive(Debug, Clone, Default)]
pub struct LastBeat(Arc<AtomicI64>);

impl LastBeat {
    /// `None` until the first beat.
    pub fn get(&self) -> Option<DateTime<Utc>> {
        match self.0.load(Ordering::Acquire) {
            0 => None,
            millis => DateTime::from_timestamp_millis(millis),
        }
    }

    fn record(&self, at: DateTime<Utc>) {
        self.0.store(at.timestamp_millis(), Ordering::Release);
    }
}

/// Spawn a background task that logs a liveness line every `interval`.
///
/// Returns a `JoinHandle`, the last-beat tracker and a shutdown flag. Set
/// the flag to stop beating; the task exits on its next tick.
pub fn spawn_heartbeat(interval: Duration) -> (JoinHandle<()>, LastBeat, Arc<AtomicBool>) {
    let last_beat = LastBeat::default();
    let (handle, shutdown) = spawn_beating(interval, last_beat.clone());
    (handle, last_beat, shutdown)
}

fn spawn_beating(interval: Duration, beats: LastBeat) -> (JoinHandle<()>, Arc<AtomicBool>) {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);

    let handle = tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        loop {
            tick.tick().await;

            if shutdown.load(Ordering::Relaxed) {
                info!("Heartbeat stopped");
                return;
            }

            let now = Utc::now();
            beats.record(now);
            info!(at = %now.to_rfc3339(), "[heartbeat] app alive");
        }
    });

    (handle, shutdown_flag)
}

/// A heartbeat that can be switched on and off.
///
/// The last-beat time survives restarts so it can still be reported while
/// the heartbeat is off.
pub struct Heartbeat {
    interval: Duration,
    last_beat: LastBeat,
    running: Option<(JoinHandle<()>, Arc<AtomicBool>)>,
}

impl Heartbeat {
    /// A stopped heartbeat.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_beat: LastBeat::default(),
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn last_beat(&self) -> Option<DateTime<Utc>> {
        self.last_beat.get()
    }

    /// Start beating. No-op if already running.
    pub fn start(&mut self) {
        if self.running.is_none() {
            info!(interval_secs = self.interval.as_secs(), "Heartbeat started");
            self.running = Some(spawn_beating(self.interval, self.last_beat.clone()));
        }
    }

    /// Stop beating. No-op if already stopped.
    pub fn stop(&mut self) {
        if let Some((handle, shutdown)) = self.running.take() {
            shutdown.store(true, Ordering::Relaxed);
            handle.abort();
        }
    }

    /// Flip on/off, returning whether it is now running.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// One-line status for display.
    pub fn status(&self) -> String {
        let state = if self.is_running() { "on" } else { "off" };
        match self.last_beat() {
            Some(at) => format!("Heartbeat {state} (last beat {})", at.to_rfc3339()),
            None => format!("Heartbeat {state} (no beat yet)"),
        }
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_beat_before_start() {
        assert!(LastBeat::default().get().is_none());
    }

    #[tokio::test]
    async fn beats_then_stops() {
        let started = Utc::now();
        let (handle, last_beat, shutdown) = spawn_heartbeat(Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let beat = last_beat.get().expect("heartbeat should have beaten");
        assert!(beat >= started - chrono::Duration::seconds(1));

        shutdown.store(true, Ordering::Relaxed);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("heartbeat task did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn toggle_keeps_last_beat() {
        let mut heartbeat = Heartbeat::new(Duration::from_millis(10));
        assert!(!heartbeat.is_running());
        assert_eq!(heartbeat.status(), "Heartbeat off (no beat yet)");

        assert!(heartbeat.toggle());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(heartbeat.last_beat().is_some());
        assert!(heartbeat.status().starts_with("Heartbeat on (last beat "));

        assert!(!heartbeat.toggle());
        let frozen = heartbeat.last_beat();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(heartbeat.last_beat(), frozen);
        assert!(heartbeat.status().starts_with("Heartbeat off (last beat "));
    }

    #[tokio::test]
    async fn start_twice_is_single_task() {
        let mut heartbeat = Heartbeat::new(Duration::from_millis(10));
        heartbeat.start();
        heartbeat.start();
        assert!(heartbeat.is_running());
        heartbeat.stop();
        heartbeat.stop();
        assert!(!heartbeat.is_running());
    }
}
