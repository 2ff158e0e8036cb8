//! License state: activation, deactivation and access gating.
//!
//! Status is never stored. Each query recomputes it from the device id, the
//! stored activation code and the first-run timestamp:
//!
//! - `Active` if the stored code validates for this device
//! - otherwise `Trial` while the trial window is open
//! - otherwise `Expired`

use crate::clock::{Clock, SystemClock};
use crate::config::LicenseConfig;
use crate::device::{DeviceId, DeviceIdentity};
use crate::error::LicenseResult;
use crate::key::{ActivationCode, normalize};
use crate::store::{Store, keys};
use crate::trial::TrialClock;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Derived license state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// A valid activation code is stored for this device.
    Active,
    /// No valid code, but the trial window is still open.
    Trial,
    /// No valid code and the trial window has closed.
    Expired,
}

impl LicenseStatus {
    /// Returns true if the application may be used (Active or Trial).
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active | Self::Trial)
    }

    /// Lower-case name, as shown to the user and serialised.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trial => "trial",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the settings and activation screens display, computed at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSnapshot {
    pub status: LicenseStatus,
    pub device_id: DeviceId,
    pub trial_days_remaining: u32,
    pub can_access: bool,
}

/// Callback run after deactivation so the host can restart or reload.
pub type ReloadHook = Box<dyn Fn() + Send + Sync>;

/// Application-facing license API.
pub struct LicenseManager<S: Store, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: LicenseConfig,
    on_reload: Option<ReloadHook>,
}

impl<S: Store> LicenseManager<S, SystemClock> {
    /// Manager over `store` with the default configuration and wall clock.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SystemClock, LicenseConfig::default())
    }
}

impl<S: Store, C: Clock> LicenseManager<S, C> {
    /// Manager with an explicit clock and configuration.
    pub fn with_config(store: S, clock: C, config: LicenseConfig) -> Self {
        Self {
            store,
            clock,
            config,
            on_reload: None,
        }
    }

    /// Registers the hook run by [`LicenseManager::deactivate`].
    #[must_use]
    pub fn on_reload(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reload = Some(Box::new(hook));
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LicenseConfig {
        &self.config
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn identity(&self) -> DeviceIdentity<'_, S> {
        DeviceIdentity::new(&self.store, &self.config.device_prefix)
    }

    fn trial(&self) -> TrialClock<'_, S, C> {
        TrialClock::new(&self.store, &self.clock, self.config.trial_days)
    }

    /// Records first run if needed. Call once at startup.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn init_first_run(&self) -> LicenseResult<()> {
        self.trial().init_first_run()
    }

    /// This installation's identifier, created on first call.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn device_id(&self) -> LicenseResult<DeviceId> {
        self.identity().device_id()
    }

    /// Recomputes the license status.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn license_status(&self) -> LicenseResult<LicenseStatus> {
        let device_id = self.device_id()?;
        self.status_for(&device_id)
    }

    fn status_for(&self, device_id: &DeviceId) -> LicenseResult<LicenseStatus> {
        if let Some(stored) = self.store.get(keys::LICENSE_KEY)? {
            if ActivationCode::validate(&stored, device_id.as_str(), &self.config.secret) {
                return Ok(LicenseStatus::Active);
            }
            debug!(device_id = %device_id, "Stored activation code does not match this device");
        }

        if self.trial().is_within_trial()? {
            Ok(LicenseStatus::Trial)
        } else {
            Ok(LicenseStatus::Expired)
        }
    }

    /// Whole trial days left (rounded up, never negative).
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn trial_days_remaining(&self) -> LicenseResult<u32> {
        self.trial().days_remaining()
    }

    /// True when the status is Active or Trial.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn can_access_app(&self) -> LicenseResult<bool> {
        Ok(self.license_status()?.is_usable())
    }

    /// Validates `code` for this device and stores it on success.
    ///
    /// Input is trimmed and upper-cased first. A wrong code returns
    /// `Ok(false)` and leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn activate(&self, code: &str) -> LicenseResult<bool> {
        let device_id = self.device_id()?;
        let expected = ActivationCode::derive(device_id.as_str(), &self.config.secret);

        if !expected.matches(code) {
            warn!(device_id = %device_id, "Rejected activation code");
            return Ok(false);
        }

        self.store.set(keys::LICENSE_KEY, &normalize(code))?;
        info!(device_id = %device_id, "License activated");
        Ok(true)
    }

    /// Removes the stored activation code and runs the reload hook.
    ///
    /// The first-run timestamp is left alone, so the status falls back to
    /// whatever the original trial window allows.
    ///
    /// # Errors
    ///
    /// Only store failures are reported; the hook is not run on failure.
    pub fn deactivate(&self) -> LicenseResult<()> {
        self.store.remove(keys::LICENSE_KEY)?;
        info!("License deactivated");
        if let Some(hook) = &self.on_reload {
            hook();
        }
        Ok(())
    }

    /// Status, device id and trial days for display.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn snapshot(&self) -> LicenseResult<LicenseSnapshot> {
        let device_id = self.device_id()?;
        let status = self.status_for(&device_id)?;
        Ok(LicenseSnapshot {
            status,
            trial_days_remaining: self.trial_days_remaining()?,
            can_access: status.is_usable(),
            device_id,
        })
    }

    /// Issues the activation code for another installation, as the in-app
    /// administrator generator does. The id is trimmed first.
    #[must_use]
    pub fn issue_code(&self, device_id: &str) -> ActivationCode {
        ActivationCode::derive(device_id.trim(), &self.config.secret)
    }
}

impl<S: Store + fmt::Debug, C: Clock + fmt::Debug> fmt::Debug for LicenseManager<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LicenseManager")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .field("trial_days", &self.config.trial_days)
            .field("has_reload_hook", &self.on_reload.is_some())
            .finish_non_exhaustive()
    }
}
