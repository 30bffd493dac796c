//! Background thread that watches a mixer for changes.
//!
//! The thread opens its own device through a factory, waits on it with a
//! timeout and posts a [`VolumeState`] after every change.  The channel is
//! bounded; when the main loop falls behind, new snapshots are dropped
//! since the next one supersedes them anyway.

use super::{read_state, MixerError, VolumeState};
use crate::traits::MixerDevice;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Opens the device the watcher thread polls.
pub type DeviceFactory =
    Box<dyn FnOnce() -> Result<Box<dyn MixerDevice>, MixerError> + Send + 'static>;

/// Handle to the polling thread.  Dropping it stops the thread.
pub struct MixerWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MixerWatcher {
    /// Start polling.  Returns the handle and the receiving end of the
    /// snapshot channel, which holds at most `capacity` snapshots.
    pub fn spawn(
        open: DeviceFactory,
        poll_timeout: Duration,
        capacity: usize,
    ) -> Result<(Self, Receiver<VolumeState>), MixerError> {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = std::thread::Builder::new()
            .name("handle-mixer-events".into())
            .spawn(move || {
                match open() {
                    Ok(device) => watch(device.as_ref(), &flag, &tx, poll_timeout),
                    Err(e) => warn!("mixer watcher: {}", e),
                }
                flag.store(false, Ordering::SeqCst);
                debug!("mixer watcher exited");
            })?;

        info!("mixer watcher started (timeout {:?})", poll_timeout);
        Ok((
            Self {
                running,
                handle: Some(handle),
            },
            rx,
        ))
    }

    /// Whether the thread is still polling.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the thread and wait for it.  Returns within one poll timeout.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("mixer watcher panicked");
            }
        }
    }
}

impl Drop for MixerWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn watch(
    device: &dyn MixerDevice,
    running: &AtomicBool,
    tx: &SyncSender<VolumeState>,
    poll_timeout: Duration,
) {
    if let Ok(state) = read_state(device) {
        if !post(tx, state) {
            return;
        }
    }

    while running.load(Ordering::SeqCst) {
        match device.wait(poll_timeout) {
            Ok(false) => {}
            Ok(true) => match read_state(device) {
                Ok(state) => {
                    if !post(tx, state) {
                        return;
                    }
                }
                Err(e) => warn!("reading mixer: {}", e),
            },
            Err(e) => {
                warn!("waiting on mixer: {}", e);
                std::thread::sleep(poll_timeout);
            }
        }
    }
}

/// Returns `false` once the receiver is gone.
fn post(tx: &SyncSender<VolumeState>, state: VolumeState) -> bool {
    match tx.try_send(state) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("mixer channel full, dropping snapshot");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::VolumeRange;
    use std::sync::atomic::AtomicI64;
    use std::time::Instant;

    /// Device that reports a change on every wait and bumps its volume.
    struct TickingMixer {
        raw: AtomicI64,
        tick: Duration,
    }

    impl MixerDevice for TickingMixer {
        fn volume_range(&self) -> VolumeRange {
            VolumeRange::new(0, 100)
        }

        fn playback_volume(&self) -> Result<i64, MixerError> {
            Ok(self.raw.load(Ordering::SeqCst))
        }

        fn playback_unmuted(&self) -> Result<bool, MixerError> {
            Ok(true)
        }

        fn set_playback_volume(&self, raw: i64) -> Result<(), MixerError> {
            self.raw.store(raw, Ordering::SeqCst);
            Ok(())
        }

        fn wait(&self, timeout: Duration) -> Result<bool, MixerError> {
            std::thread::sleep(self.tick.min(timeout));
            self.raw.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn ticking(start: i64, tick: Duration) -> DeviceFactory {
        Box::new(move || {
            Ok(Box::new(TickingMixer {
                raw: AtomicI64::new(start),
                tick,
            }) as Box<dyn MixerDevice>)
        })
    }

    #[test]
    fn first_snapshot_is_the_initial_state() {
        let (mut w, rx) =
            MixerWatcher::spawn(ticking(40, Duration::from_millis(50)), Duration::from_millis(50), 4)
                .unwrap();
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.percentage, 40.0);
        assert!(!first.muted);
        w.shutdown();
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (mut w, rx) =
            MixerWatcher::spawn(ticking(0, Duration::from_millis(1)), Duration::from_millis(20), 2)
                .unwrap();
        std::thread::sleep(Duration::from_millis(100));
        // The thread kept running even though nobody drained the channel.
        assert!(w.is_running());
        let start = Instant::now();
        w.shutdown();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn shutdown_returns_within_poll_timeout() {
        let (mut w, _rx) =
            MixerWatcher::spawn(ticking(0, Duration::from_millis(200)), Duration::from_millis(200), 8)
                .unwrap();
        std::thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        w.shutdown();
        assert!(start.elapsed() < Duration::from_millis(600));
        assert!(!w.is_running());
    }

    #[test]
    fn open_failure_stops_the_thread() {
        let (w, rx) = MixerWatcher::spawn(
            Box::new(|| Err(MixerError::Unsupported)),
            Duration::from_millis(10),
            1,
        )
        .unwrap();
        // The sender is dropped with the thread, so the channel disconnects.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
        drop(w);
    }

    #[test]
    fn dropped_receiver_ends_the_thread() {
        let (w, rx) =
            MixerWatcher::spawn(ticking(0, Duration::from_millis(5)), Duration::from_millis(5), 1)
                .unwrap();
        drop(rx);
        let deadline = Instant::now() + Duration::from_secs(2);
        while w.is_running() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!w.is_running());
    }
}
