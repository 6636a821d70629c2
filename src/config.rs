//! Accessory configuration and persisted context.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::status::{DeviceIdentity, FloodlightState};

type Result<T> = std::result::Result<T, Error>;

/// Connection target of a floodlight device.
///
/// Immutable for an accessory's lifetime. Construction validates the host and
/// port; a misconfigured endpoint is fatal up front rather than a runtime
/// surprise.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint {
    host: String,
    port: u16,
}

impl DeviceEndpoint {
    /// Create an endpoint, rejecting an empty host or zero port.
    ///
    /// # Examples
    ///
    /// ```
    /// use floodlight_rs::DeviceEndpoint;
    ///
    /// let endpoint = DeviceEndpoint::new("192.168.1.40", 80).unwrap();
    /// assert_eq!(endpoint.authority(), "192.168.1.40:80");
    ///
    /// assert!(DeviceEndpoint::new("", 80).is_err());
    /// assert!(DeviceEndpoint::new("192.168.1.40", 0).is_err());
    /// ```
    pub fn new(host: &str, port: u16) -> Result<Self> {
        if host.is_empty() {
            return Err(Error::invalid_endpoint("must set a host"));
        }
        if port == 0 {
            return Err(Error::invalid_endpoint("must set a port"));
        }
        Ok(DeviceEndpoint {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `host:port` form used for connecting and the HTTP Host header.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-accessory record persisted by the hub's accessory cache.
///
/// The hub owns storage of this record; the library reads the endpoint from
/// it at construction and writes back the most recently cached state and
/// identity via [`crate::FloodlightAccessory::sync_context`].
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
pub struct AccessoryContext {
    /// Display name chosen by the user.
    pub name: Option<String>,
    /// Device host; required.
    pub host: Option<String>,
    /// Device port; required.
    pub port: Option<u16>,
    /// Last cached lighting state, if any run observed one.
    pub state: Option<FloodlightState>,
    /// Device identity, fetched at most once.
    pub identity: Option<DeviceIdentity>,
}

impl AccessoryContext {
    /// Extract and validate the device endpoint.
    pub fn endpoint(&self) -> Result<DeviceEndpoint> {
        let host = self.host.as_deref().unwrap_or("");
        DeviceEndpoint::new(host, self.port.unwrap_or(0))
    }
}
