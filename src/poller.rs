//! Background polling of device state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, error};

use crate::accessory::FloodlightAccessory;
use crate::runtime::{self, JoinHandle};

/// The hub's asynchronous characteristic-update capability.
///
/// The polling driver pushes refreshed values through this instead of
/// returning them to a caller. Implementations typically forward to the
/// hub's `updateCharacteristic` equivalent.
pub trait CharacteristicSink: Send + Sync + 'static {
    /// Push an out-of-band On/Off update.
    fn update_on(&self, on: bool);

    /// Push an out-of-band Brightness update.
    fn update_brightness(&self, brightness: u8);
}

/// Periodic background refresh of an accessory's state.
///
/// Runs for the lifetime of the accessory. Each cycle awaits the read's full
/// settlement (fresh value or cached fallback) before sleeping for the next
/// interval, so a slow device can never cause overlapping polls.
pub struct StatePoller {
    running: Arc<AtomicBool>,
    handle: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Default for StatePoller {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePoller {
    /// Default refresh interval between settled polls.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

    /// Per-poll read deadline; a timed-out poll pushes the cached value.
    const POLL_TIMEOUT: Duration = Duration::from_millis(1500);

    pub fn new() -> Self {
        StatePoller {
            running: Arc::new(AtomicBool::new(false)),
            handle: std::sync::Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start polling the accessory, pushing each settled state into `sink`.
    ///
    /// Starting an already-running poller is a no-op.
    pub fn start<S: CharacteristicSink>(
        &self,
        accessory: FloodlightAccessory,
        sink: S,
        interval: Duration,
    ) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let running = Arc::clone(&self.running);
        let handle = runtime::spawn(async move {
            while running.load(Ordering::SeqCst) {
                match accessory.get_state(Self::POLL_TIMEOUT).await {
                    Ok(state) => {
                        debug!(
                            "poll -> on={} brightness={}",
                            state.on(),
                            state.brightness()
                        );
                        sink.update_on(state.on());
                        sink.update_brightness(state.brightness());
                    }
                    Err(e) => {
                        // Timeouts already degraded to the cached value, so
                        // anything landing here is a real failure.
                        error!("poll error -> {}", e);
                    }
                }
                runtime::sleep(interval).await;
            }
        });

        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Stop polling. The current cycle is aborted where the runtime supports
    /// it and otherwise winds down at its next wakeup.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for StatePoller {
    fn drop(&mut self) {
        self.stop();
    }
}
