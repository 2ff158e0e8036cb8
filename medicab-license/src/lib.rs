//! Offline licensing and trial gating for Medicab.
//!
//! This crate handles:
//! - A stable, phone-dictatable device identifier per installation
//! - Activation code derivation from (device id, shared secret)
//! - A 7-day trial window anchored at first run
//! - The active / trial / expired status the application gates on
//!
//! # Design Principles
//!
//! - **Fully offline**: codes are re-derived locally, nothing is sent anywhere
//! - **Nothing cached**: status is recomputed from stored facts on every query
//! - **Injected state**: every component works over a [`Store`] and a [`Clock`]
//!
//! # Activation Code Format
//!
//! `XXXX-XXXX-XXXX-XXXX` over `ABCDEFGHJKLMNPQRSTUVWXYZ23456789`. See
//! [`ActivationCode::derive`] for the algorithm. The vendor tool
//! `medicab-keygen` uses the same function.

mod activation;
mod clock;
mod config;
mod device;
mod error;
mod key;
mod store;
mod trial;

pub use activation::{LicenseManager, LicenseSnapshot, LicenseStatus, ReloadHook};
pub use clock::{Clock, MS_PER_DAY, ManualClock, SystemClock};
pub use config::{DEFAULT_DEVICE_PREFIX, DEFAULT_SECRET, DEFAULT_TRIAL_DAYS, LicenseConfig};
pub use device::{DEVICE_ID_ALPHABET, DEVICE_ID_RANDOM_LEN, DeviceId, DeviceIdentity};
pub use error::{LicenseError, LicenseResult};
pub use key::{
    ActivationCode, CODE_ALPHABET, CODE_CHARS, CODE_LENGTH, GROUP_SIZE, derive_key, normalize,
    rolling_hash, validate_key,
};
pub use store::{JsonFileStore, MemoryStore, Store, keys};
pub use trial::TrialClock;
