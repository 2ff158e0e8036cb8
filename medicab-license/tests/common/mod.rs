//! Shared test helpers for license tests.

#![allow(dead_code)]

use medicab_license::{LicenseConfig, LicenseManager, MS_PER_DAY, ManualClock, MemoryStore, keys};
use std::sync::Arc;

/// A fixed "now": 2025-10-09T08:53:20Z.
pub const NOW: i64 = 1_760_000_000_000;

/// Manager over shared in-memory state so tests can inspect and move time.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub manager: LicenseManager<Arc<MemoryStore>, Arc<ManualClock>>,
}

impl Harness {
    pub fn new(config: LicenseConfig) -> Self {
        Self::with_store(MemoryStore::new(), config)
    }

    pub fn with_store(store: MemoryStore, config: LicenseConfig) -> Self {
        let store = Arc::new(store);
        let clock = Arc::new(ManualClock::new(NOW));
        let manager = LicenseManager::with_config(store.clone(), clock.clone(), config);
        Self {
            store,
            clock,
            manager,
        }
    }

    /// Harness for a device whose id is already persisted.
    pub fn for_device(device_id: &str, config: LicenseConfig) -> Self {
        Self::with_store(MemoryStore::with_entries([(keys::DEVICE_ID, device_id)]), config)
    }
}

/// Default config with the short test secret `S`.
pub fn secret_s() -> LicenseConfig {
    LicenseConfig::with_secret("S")
}

pub fn days(n: i64) -> i64 {
    n * MS_PER_DAY
}
