//! Floodlight state tracking.

use serde::{Deserialize, Serialize};

/// The last known lighting state of a floodlight.
///
/// This is a "best known value": it is only ever overwritten by a newer
/// successful read or write, never invalidated. A stale value remains valid
/// until superseded.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FloodlightState {
    on: bool,
    brightness: u8,
}

impl FloodlightState {
    /// Create a state with the given power and brightness (0-100).
    ///
    /// # Examples
    ///
    /// ```
    /// use floodlight_rs::FloodlightState;
    ///
    /// let state = FloodlightState::new(true, 80);
    /// assert!(state.on());
    /// assert_eq!(state.brightness(), 80);
    /// ```
    pub fn new(on: bool, brightness: u8) -> Self {
        FloodlightState {
            on,
            brightness: brightness.min(100),
        }
    }

    /// Whether the light is on.
    pub fn on(&self) -> bool {
        self.on
    }

    /// Brightness from 0 to 100 percent.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Replace this state with a freshly observed one.
    ///
    /// Merges are a full replace: a successful device read is authoritative
    /// for both fields.
    pub fn update(&mut self, other: &Self) {
        self.on = other.on;
        self.brightness = other.brightness;
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    pub(crate) fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
    }
}

/// Static identity of a floodlight device.
///
/// Immutable once fetched; callers should fetch it once per accessory
/// lifetime and cache it externally.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    manufacturer: String,
    model: String,
    serial: String,
}

impl DeviceIdentity {
    pub fn new(manufacturer: &str, model: &str, serial: &str) -> Self {
        DeviceIdentity {
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            serial: serial.to_string(),
        }
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }
}
