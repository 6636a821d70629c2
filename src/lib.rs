//! # floodlight_rs
//!
//! An async Rust library for controlling network-attached floodlight devices
//! over their HTTP/JSON control API.
//!
//! This crate provides a **runtime-agnostic** async client for floodlights
//! that expose the `API10` media-config protocol. It reads and sets the two
//! lighting properties the device offers - on/off and brightness - and
//! fetches the static device identity (manufacturer, model, serial).
//!
//! These devices are slow and occasionally unresponsive, so the library is
//! built around bounded deadlines and graceful degradation: every device call
//! carries a per-call timeout, and the [`FloodlightAccessory`] wrapper caches
//! the last observed state and serves it when a read times out, keeping the
//! hub's UI responsive during an outage. Writes never degrade - a failed
//! command surfaces as an error.
//!
//! ## Quick Start
//!
//! ```ignore
//! use floodlight_rs::{AccessoryContext, FloodlightAccessory};
//!
//! // Works with any async runtime!
//! async fn control_floodlight() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = AccessoryContext {
//!         host: Some("192.168.1.40".to_string()),
//!         port: Some(80),
//!         ..Default::default()
//!     };
//!
//!     let accessory = FloodlightAccessory::new(&context)?;
//!     accessory.initialize().await?;
//!
//!     accessory.set_on(true).await?;
//!     accessory.set_brightness(75).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Typed Device API**: [`DeviceApi`] for direct get/set operations
//! - **Cached Reads**: [`FloodlightAccessory`] falls back to the last known
//!   [`FloodlightState`] when a read times out
//! - **Background Refresh**: [`StatePoller`] pushes periodic updates through a
//!   [`CharacteristicSink`]
//! - **Hub Persistence**: [`AccessoryContext`] round-trips through the hub's
//!   accessory cache
//!
//! ## Communication
//!
//! All communication is plain HTTP/1.1 over TCP, one request per call. The
//! device must be reachable on the local network at a fixed host and port.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using
//! feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! floodlight-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! floodlight-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! floodlight-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod accessory;
mod config;
mod device;
mod errors;
mod media;
mod poller;
pub mod runtime;
mod status;
mod transport;

// Re-export public API
pub use accessory::FloodlightAccessory;
pub use config::{AccessoryContext, DeviceEndpoint};
pub use device::DeviceApi;
pub use errors::Error;
pub use media::MediaConfig;
pub use poller::{CharacteristicSink, StatePoller};
pub use status::{DeviceIdentity, FloodlightState};
