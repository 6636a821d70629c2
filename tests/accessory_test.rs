//! Integration tests for the accessory cache, timeout fallback, and poller.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use common::{StubDevice, StubResponse};
use floodlight_rs::{
    AccessoryContext, CharacteristicSink, Error, FloodlightAccessory, FloodlightState,
    StatePoller,
};

fn context_for(stub: &StubDevice, cached: Option<FloodlightState>) -> AccessoryContext {
    AccessoryContext {
        host: Some(stub.host()),
        port: Some(stub.port()),
        state: cached,
        ..Default::default()
    }
}

#[tokio::test]
async fn missing_endpoint_is_fatal_at_construction() {
    let err = FloodlightAccessory::new(&AccessoryContext::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint(_)));
}

#[tokio::test]
async fn read_timeout_falls_back_to_cached_value() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 50}))
            .after(Duration::from_secs(2))
    });
    let cached = FloodlightState::new(false, 20);
    let accessory =
        FloodlightAccessory::new(&context_for(&stub, Some(cached.clone()))).unwrap();

    let state = accessory.get_state(Duration::from_millis(1)).await.unwrap();
    assert_eq!(state, cached);
}

#[tokio::test]
async fn late_response_merges_into_cache_exactly_once() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 50}))
            .after(Duration::from_millis(300))
    });
    let cached = FloodlightState::new(false, 20);
    let accessory =
        FloodlightAccessory::new(&context_for(&stub, Some(cached.clone()))).unwrap();

    // The response arrives well after the deadline: the caller gets the
    // cached value, not an error and not the late value.
    let returned = accessory.get_state(Duration::from_millis(1)).await.unwrap();
    assert_eq!(returned, cached);
    assert_eq!(accessory.cached_state().await, cached);

    // Once the in-flight read settles, the cache reflects the late response.
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(
        accessory.cached_state().await,
        FloodlightState::new(true, 50)
    );
    // Exactly one device read happened for the one get_state call.
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn successful_read_replaces_cache() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 65}))
    });
    let accessory = FloodlightAccessory::new(&context_for(
        &stub,
        Some(FloodlightState::new(false, 20)),
    ))
    .unwrap();

    let state = accessory.get_state(Duration::from_secs(2)).await.unwrap();
    assert_eq!(state, FloodlightState::new(true, 65));
    assert_eq!(accessory.cached_state().await, state);
}

#[tokio::test]
async fn http_error_propagates_instead_of_falling_back() {
    let stub = StubDevice::spawn(|_| StubResponse::status(500, json!({})));
    let accessory = FloodlightAccessory::new(&context_for(
        &stub,
        Some(FloodlightState::new(false, 20)),
    ))
    .unwrap();

    let err = accessory.get_state(Duration::from_secs(2)).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus(500)));
    // The cache keeps the last known value untouched.
    assert_eq!(
        accessory.cached_state().await,
        FloodlightState::new(false, 20)
    );
}

#[tokio::test]
async fn set_brightness_merges_confirmed_value() {
    let stub = StubDevice::spawn(|request| {
        if request.path == "/API10/setMediaConfig" {
            StubResponse::json(json!({"Light Intensity": 75}))
        } else {
            StubResponse::json(json!({}))
        }
    });
    let accessory = FloodlightAccessory::new(&context_for(
        &stub,
        Some(FloodlightState::new(true, 20)),
    ))
    .unwrap();

    let confirmed = accessory.set_brightness(75).await.unwrap();
    assert_eq!(confirmed, 75);
    assert_eq!(accessory.cached_state().await.brightness(), 75);
    // The on/off half of the cache is untouched by a brightness write.
    assert!(accessory.cached_state().await.on());
}

#[tokio::test]
async fn failed_write_propagates_and_leaves_cache_alone() {
    let stub = StubDevice::spawn(|_| StubResponse::status(500, json!({})));
    let cached = FloodlightState::new(false, 20);
    let accessory =
        FloodlightAccessory::new(&context_for(&stub, Some(cached.clone()))).unwrap();

    let err = accessory.set_on(true).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus(500)));
    assert_eq!(accessory.cached_state().await, cached);
}

#[tokio::test]
async fn concurrent_reads_with_different_deadlines_stay_consistent() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 60}))
            .after(Duration::from_millis(300))
    });
    let cached = FloodlightState::new(false, 20);
    let accessory =
        FloodlightAccessory::new(&context_for(&stub, Some(cached.clone()))).unwrap();

    let (short, long) = futures::join!(
        accessory.get_state(Duration::from_millis(50)),
        accessory.get_state(Duration::from_secs(5)),
    );

    // The short deadline degrades to the cache, the long one gets the live
    // value, and the cache ends up holding the live value.
    assert_eq!(short.unwrap(), cached);
    assert_eq!(long.unwrap(), FloodlightState::new(true, 60));
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(
        accessory.cached_state().await,
        FloodlightState::new(true, 60)
    );
}

#[tokio::test]
async fn initialize_fetches_identity_once_and_seeds_state() {
    let stub = StubDevice::spawn(|request| match request.path.as_str() {
        "/API10/getDeviceInfo" => StubResponse::json(json!({
            "Manufacturer": "Acme",
            "Model": "FL-1000",
            "Serial": "00-11-22",
        })),
        _ => StubResponse::json(json!({"Light": 1, "Light Intensity": 40})),
    });
    let mut context = context_for(&stub, None);
    let accessory = FloodlightAccessory::new(&context).unwrap();

    let state = accessory.initialize().await.unwrap();
    assert_eq!(state, FloodlightState::new(true, 40));

    // Identity is cached after the first fetch.
    let identity = accessory.identity().await.unwrap();
    assert_eq!(identity.serial(), "00-11-22");
    let info_requests = stub
        .requests()
        .iter()
        .filter(|r| r.path == "/API10/getDeviceInfo")
        .count();
    assert_eq!(info_requests, 1);

    accessory.sync_context(&mut context).await;
    assert_eq!(context.state, Some(FloodlightState::new(true, 40)));
    assert_eq!(context.identity, Some(identity));
}

#[tokio::test]
async fn context_seeded_identity_skips_the_fetch() {
    let stub = StubDevice::spawn(|_| StubResponse::json(json!({})));
    let mut context = context_for(&stub, None);
    context.identity = Some(floodlight_rs::DeviceIdentity::new(
        "Acme", "FL-1000", "00-11-22",
    ));
    let accessory = FloodlightAccessory::new(&context).unwrap();

    let identity = accessory.identity().await.unwrap();
    assert_eq!(identity.manufacturer(), "Acme");
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn interactive_handlers_read_through_the_cache() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 80}))
    });
    let accessory = FloodlightAccessory::new(&context_for(&stub, None)).unwrap();

    assert!(accessory.get_on().await.unwrap());
    assert_eq!(accessory.get_brightness().await.unwrap(), 80);
}

#[derive(Clone, Default)]
struct RecordingSink {
    updates: Arc<Mutex<Vec<(bool, u8)>>>,
    last_on: Arc<Mutex<Option<bool>>>,
}

impl CharacteristicSink for RecordingSink {
    fn update_on(&self, on: bool) {
        *self.last_on.lock().unwrap() = Some(on);
    }

    fn update_brightness(&self, brightness: u8) {
        let on = self.last_on.lock().unwrap().unwrap_or_default();
        self.updates.lock().unwrap().push((on, brightness));
    }
}

#[tokio::test]
async fn poller_pushes_settled_states_without_overlap() {
    let stub = StubDevice::spawn(|_| {
        StubResponse::json(json!({"Light": 1, "Light Intensity": 42}))
    });
    let accessory = FloodlightAccessory::new(&context_for(&stub, None)).unwrap();

    let sink = RecordingSink::default();
    let poller = StatePoller::new();
    poller.start(accessory, sink.clone(), Duration::from_millis(50));
    assert!(poller.is_running());

    tokio::time::sleep(Duration::from_millis(400)).await;
    poller.stop();
    assert!(!poller.is_running());

    let updates = sink.updates.lock().unwrap().clone();
    assert!(updates.len() >= 2, "expected repeated polls, got {updates:?}");
    assert!(updates.iter().all(|&(on, brightness)| on && brightness == 42));

    // One request per settled cycle - polls never overlap.
    assert!(stub.request_count() >= updates.len());
}
