//! Stateful accessory wrapper: cached state with timeout fallback.

use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;
use log::debug;

use crate::config::AccessoryContext;
use crate::device::DeviceApi;
use crate::errors::Error;
use crate::runtime::{self, Mutex};
use crate::status::{DeviceIdentity, FloodlightState};

type Result<T> = std::result::Result<T, Error>;

/// A floodlight accessory as the hub sees it.
///
/// Wraps a [`DeviceApi`] with the last observed [`FloodlightState`] so the
/// hub gets an answer quickly even when the device is momentarily
/// unreachable: a read that times out returns the cached value instead of an
/// error, while every other failure propagates. Writes never fall back - a
/// failed command must be visible.
///
/// Cloning is cheap and clones share the same cache, which is what the
/// polling driver relies on.
///
/// # Example
///
/// ```ignore
/// use floodlight_rs::{AccessoryContext, FloodlightAccessory};
///
/// let mut context: AccessoryContext = load_from_hub_cache();
/// let accessory = FloodlightAccessory::new(&context)?;
/// accessory.initialize().await?;
/// accessory.sync_context(&mut context).await;
///
/// let on = accessory.get_on().await?;
/// ```
#[derive(Clone, Debug)]
pub struct FloodlightAccessory {
    api: Arc<DeviceApi>,
    state: Arc<Mutex<FloodlightState>>,
    identity: Arc<Mutex<Option<DeviceIdentity>>>,
}

impl FloodlightAccessory {
    /// Deadline for hub-driven interactive reads. The hub UI blocks on
    /// these, so they must settle fast and fall back to the cache.
    pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_millis(1500);

    /// Deadline for cold-start reads, where blocking is acceptable.
    pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

    /// How long a read left behind by a timeout fallback may keep running
    /// before it is abandoned. A late success inside this window still
    /// merges into the cache.
    const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build an accessory from the hub's persisted context.
    ///
    /// Fails with [`Error::InvalidEndpoint`] when the context is missing its
    /// host or port; this is fatal at construction time by design. The cache
    /// is seeded from the context's persisted state, if any.
    pub fn new(context: &AccessoryContext) -> Result<Self> {
        let endpoint = context.endpoint()?;
        Ok(FloodlightAccessory {
            api: Arc::new(DeviceApi::new(endpoint)),
            state: Arc::new(Mutex::new(context.state.clone().unwrap_or_default())),
            identity: Arc::new(Mutex::new(context.identity.clone())),
        })
    }

    /// The wrapped device API.
    pub fn api(&self) -> &DeviceApi {
        &self.api
    }

    /// Current cached state without touching the device.
    pub async fn cached_state(&self) -> FloodlightState {
        self.state.lock().await.clone()
    }

    /// Device identity, fetched from the device at most once.
    ///
    /// A context-seeded identity short-circuits the fetch entirely.
    pub async fn identity(&self) -> Result<DeviceIdentity> {
        let mut identity = self.identity.lock().await;
        if let Some(known) = identity.as_ref() {
            return Ok(known.clone());
        }
        let fetched = self.api.get_device_info().await?;
        *identity = Some(fetched.clone());
        Ok(fetched)
    }

    /// Cold-start routine: fetch identity (unless already known) and seed the
    /// cache with a long-deadline read.
    pub async fn initialize(&self) -> Result<FloodlightState> {
        self.identity().await?;
        self.get_state(Self::STARTUP_TIMEOUT).await
    }

    /// Copy the current cache back into the hub-owned context for
    /// persistence.
    pub async fn sync_context(&self, context: &mut AccessoryContext) {
        context.state = Some(self.cached_state().await);
        context.identity = self.identity.lock().await.clone();
    }

    /// Read the lighting state with a bounded deadline.
    ///
    /// On success the fresh value replaces the cache and is returned. If the
    /// deadline fires first, the cached value is returned instead and the
    /// in-flight read keeps running detached: a late success merges into the
    /// cache exactly once (the oneshot completion was already consumed, so
    /// it can never clobber the value the caller got). Any non-timeout
    /// failure propagates.
    pub async fn get_state(&self, timeout: Duration) -> Result<FloodlightState> {
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.state);
        let (tx, rx) = oneshot::channel();

        runtime::spawn(async move {
            let result = api.get_light(Self::SETTLE_TIMEOUT).await;
            if let Ok(fresh) = &result {
                cache.lock().await.update(fresh);
            }
            // Receiver may be gone already; the merge above is the only
            // side effect a late response is allowed.
            let _ = tx.send(result);
        })
        .detach();

        match runtime::timeout(timeout, rx).await {
            Ok(Ok(Ok(fresh))) => Ok(fresh),
            Ok(Ok(Err(e))) if e.is_timeout() => {
                debug!("timeout getting media config, reusing last known value");
                Ok(self.cached_state().await)
            }
            Ok(Ok(Err(e))) => Err(e),
            // Sender dropped without a result; the read task is gone.
            Ok(Err(_)) => Err(Error::Timeout),
            Err(_) => {
                debug!(
                    "timeout ({:?}) getting media config, reusing last known value",
                    timeout
                );
                Ok(self.cached_state().await)
            }
        }
    }

    /// Turn the light on or off and merge the device's confirmed value.
    ///
    /// Every error kind propagates; a write failing during an outage must
    /// surface as a failed command, not a silent success.
    pub async fn set_on(&self, on: bool) -> Result<bool> {
        debug!("setting characteristic On -> {}", on);
        let confirmed = self.api.set_light_on(on).await?;
        self.state.lock().await.set_on(confirmed);
        Ok(confirmed)
    }

    /// Set the brightness and merge the device's confirmed value.
    pub async fn set_brightness(&self, brightness: u8) -> Result<u8> {
        debug!("setting characteristic Brightness -> {}", brightness);
        let confirmed = self.api.set_light_brightness(brightness).await?;
        self.state.lock().await.set_brightness(confirmed);
        Ok(confirmed)
    }

    /// Hub "get On" handler: interactive read of the on/off characteristic.
    pub async fn get_on(&self) -> Result<bool> {
        Ok(self.get_state(Self::INTERACTIVE_TIMEOUT).await?.on())
    }

    /// Hub "get Brightness" handler: interactive read of the brightness
    /// characteristic.
    pub async fn get_brightness(&self) -> Result<u8> {
        Ok(self.get_state(Self::INTERACTIVE_TIMEOUT).await?.brightness())
    }
}
