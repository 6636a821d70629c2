//! Wire codec for the device's flat attribute map.
//!
//! The floodlight reports its configuration as a flat JSON object keyed by
//! human-readable attribute names (`"Light"`, `"Light Intensity"`, ...). This
//! module maps between that representation and the domain model. It is pure
//! and performs no I/O.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::status::{DeviceIdentity, FloodlightState};

/// A (possibly partial) media configuration as the device speaks it.
///
/// Only the attributes this library understands are typed; everything else
/// the device includes is carried in `extra` untouched, so echoing a decoded
/// configuration back never drops fields the client does not interpret.
///
/// # Examples
///
/// ```
/// use floodlight_rs::MediaConfig;
///
/// let mut config = MediaConfig::new();
/// assert_eq!(config.is_valid(), false);
///
/// config.light(true);
/// assert_eq!(config.is_valid(), true);
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(rename = "Light")]
    pub(crate) light: Option<u8>,
    #[serde(rename = "Light Intensity")]
    pub(crate) light_intensity: Option<u8>,
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl MediaConfig {
    /// Create an empty partial configuration.
    ///
    /// At least one attribute must be set before sending it to a device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this configuration carries at least one attribute the device
    /// should apply.
    pub fn is_valid(&self) -> bool {
        self.light.is_some() || self.light_intensity.is_some()
    }

    /// Set the on/off attribute (`Light`, 0|1 on the wire).
    pub fn light(&mut self, on: bool) {
        self.light = Some(u8::from(on));
    }

    /// Set the brightness attribute (`Light Intensity`, 0-100).
    pub fn light_intensity(&mut self, brightness: u8) {
        self.light_intensity = Some(brightness.min(100));
    }

    /// Decode into a [`FloodlightState`].
    ///
    /// A missing `Light Intensity` decodes as zero; supplying a cached
    /// default instead is the caller's merge responsibility.
    pub fn to_state(&self) -> FloodlightState {
        FloodlightState::new(
            self.light == Some(1),
            self.light_intensity.unwrap_or(0),
        )
    }
}

impl From<&FloodlightState> for MediaConfig {
    fn from(state: &FloodlightState) -> Self {
        let mut config = MediaConfig::new();
        config.light(state.on());
        config.light_intensity(state.brightness());
        config
    }
}

/// Device identity as reported by `getDeviceInfo`.
///
/// The device reports many more fields (firmware, NIC addresses, WiFi
/// details); they ride along in `extra` and are never interpreted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct DeviceInfo {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Serial")]
    pub serial: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&DeviceInfo> for DeviceIdentity {
    fn from(info: &DeviceInfo) -> Self {
        DeviceIdentity::new(&info.manufacturer, &info.model, &info.serial)
    }
}
