mod common;

use common::Harness;
use medicab_license::{DeviceId, DeviceIdentity, LicenseConfig, MemoryStore, Store, keys};

#[test]
fn device_id_is_created_once() {
    let h = Harness::new(LicenseConfig::default());
    assert!(h.store.get(keys::DEVICE_ID).unwrap().is_none());

    let first = h.manager.device_id().unwrap();
    let second = h.manager.device_id().unwrap();
    assert_eq!(first, second);
    assert_eq!(h.store.get(keys::DEVICE_ID).unwrap().as_deref(), Some(first.as_str()));
}

#[test]
fn device_id_format() {
    let h = Harness::new(LicenseConfig::default());
    let id = h.manager.device_id().unwrap();
    let (prefix, segment) = id.as_str().split_once('-').unwrap();
    assert_eq!(prefix, "MED");
    assert_eq!(segment.len(), 4);
    assert!(segment.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[test]
fn existing_device_id_is_never_regenerated() {
    let store = MemoryStore::with_entries([(keys::DEVICE_ID, "MED-A1B2")]);
    let identity = DeviceIdentity::new(&store, "MED");
    for _ in 0..10 {
        assert_eq!(identity.device_id().unwrap().as_str(), "MED-A1B2");
    }
}

#[test]
fn blank_stored_id_counts_as_missing() {
    let store = MemoryStore::with_entries([(keys::DEVICE_ID, "  ")]);
    let identity = DeviceIdentity::new(&store, "MED");
    assert_eq!(identity.stored().unwrap(), None);
    let id = identity.device_id().unwrap();
    assert!(id.as_str().starts_with("MED-"));
}

#[test]
fn configured_prefix() {
    let config = LicenseConfig {
        device_prefix: "CAB".to_string(),
        ..LicenseConfig::default()
    };
    let h = Harness::new(config);
    assert!(h.manager.device_id().unwrap().as_str().starts_with("CAB-"));
}

#[test]
fn device_id_serde() {
    let id = DeviceId::from("MED-A1B2");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""MED-A1B2""#);
    let parsed: DeviceId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn generated_ids_vary() {
    let ids: std::collections::HashSet<String> =
        (0..200).map(|_| DeviceId::generate("MED").into_string()).collect();
    assert!(ids.len() > 150);
}
