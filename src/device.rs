//! Typed device operations.

use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::config::DeviceEndpoint;
use crate::errors::Error;
use crate::media::{DeviceInfo, MediaConfig};
use crate::status::{DeviceIdentity, FloodlightState};
use crate::transport::{HttpClient, Method};

type Result<T> = std::result::Result<T, Error>;

/// Typed client for one floodlight device's HTTP API.
///
/// Stateless apart from the connection target; every call opens its own
/// request. For cached reads with timeout fallback, wrap this in a
/// [`crate::FloodlightAccessory`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use floodlight_rs::{DeviceApi, DeviceEndpoint};
///
/// let api = DeviceApi::new(DeviceEndpoint::new("192.168.1.40", 80)?);
/// let state = api.get_light(Duration::from_secs(10)).await?;
/// println!("on={} brightness={}", state.on(), state.brightness());
/// ```
#[derive(Debug, Clone)]
pub struct DeviceApi {
    endpoint: DeviceEndpoint,
    client: HttpClient,
}

impl DeviceApi {
    /// Default deadline for calls whose caller did not pick one. Matches the
    /// cold-start budget: blocking this long is only acceptable off the
    /// interactive path.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(endpoint: DeviceEndpoint) -> Self {
        let client = HttpClient::new(endpoint.authority());
        DeviceApi { endpoint, client }
    }

    pub fn endpoint(&self) -> &DeviceEndpoint {
        &self.endpoint
    }

    /// Fetch the current lighting state.
    pub async fn get_light(&self, timeout: Duration) -> Result<FloodlightState> {
        let data = self
            .client
            .request(Method::Get, "/API10/getMediaConfig", None, timeout)
            .await?;
        let config: MediaConfig = serde_json::from_value(data).map_err(Error::JsonLoad)?;
        Ok(config.to_state())
    }

    /// Write a full lighting state and return the device's authoritative
    /// post-write state, decoded from its response.
    pub async fn set_light(&self, state: &FloodlightState) -> Result<FloodlightState> {
        let echoed = self.set_media_config(&MediaConfig::from(state)).await?;
        Ok(echoed.to_state())
    }

    /// Turn the light on or off, sending only the changed attribute.
    ///
    /// A device under light load may not echo every field; the requested
    /// value stands in when the echo omits it.
    pub async fn set_light_on(&self, on: bool) -> Result<bool> {
        let mut config = MediaConfig::new();
        config.light(on);
        let echoed = self.set_media_config(&config).await?;
        Ok(echoed.light.map(|v| v == 1).unwrap_or(on))
    }

    /// Set the brightness, sending only the changed attribute.
    pub async fn set_light_brightness(&self, brightness: u8) -> Result<u8> {
        let mut config = MediaConfig::new();
        config.light_intensity(brightness);
        let echoed = self.set_media_config(&config).await?;
        Ok(echoed.light_intensity.unwrap_or(brightness))
    }

    /// Fetch the device's static identity.
    ///
    /// Rarely changes; fetch once and cache externally.
    pub async fn get_device_info(&self) -> Result<DeviceIdentity> {
        let data = self
            .client
            .request(
                Method::Get,
                "/API10/getDeviceInfo",
                None,
                Self::DEFAULT_TIMEOUT,
            )
            .await?;
        let info: DeviceInfo = serde_json::from_value(data).map_err(Error::JsonLoad)?;
        Ok(DeviceIdentity::from(&info))
    }

    /// POST a partial configuration and decode the device's echo.
    ///
    /// The echo may be the full resulting configuration or just the changed
    /// subset, at the device's discretion. An empty update is rejected with
    /// [`Error::NoAttribute`] before any I/O.
    pub async fn set_media_config(&self, config: &MediaConfig) -> Result<MediaConfig> {
        if !config.is_valid() {
            return Err(Error::NoAttribute);
        }

        let body: Value = serde_json::to_value(config).map_err(Error::JsonDump)?;
        debug!("set media config -> {}", body);
        let data = self
            .client
            .request(
                Method::Post,
                "/API10/setMediaConfig",
                Some(&body),
                Self::DEFAULT_TIMEOUT,
            )
            .await?;
        serde_json::from_value(data).map_err(Error::JsonLoad)
    }
}
