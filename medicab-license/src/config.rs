//! Licensing configuration.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shared secret embedded in both the application and the vendor keygen.
///
/// Anyone holding the shipped binary can recover this string. The scheme
/// deters casual copying of activation codes; it does not keep the secret.
pub const DEFAULT_SECRET: &str = "MEDICABINET_SECRET_2025";

/// Length of the trial window in days.
pub const DEFAULT_TRIAL_DAYS: u32 = 7;

/// Prefix of generated device identifiers.
pub const DEFAULT_DEVICE_PREFIX: &str = "MED";

/// Tunables for the licensing core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Key material mixed into every derived activation code.
    pub secret: String,
    /// Trial window length in days.
    pub trial_days: u32,
    /// Prefix of newly generated device identifiers.
    pub device_prefix: String,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            trial_days: DEFAULT_TRIAL_DAYS,
            device_prefix: DEFAULT_DEVICE_PREFIX.to_string(),
        }
    }
}

impl LicenseConfig {
    /// Default configuration with a different secret.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`LicenseConfig::validate`].
    pub fn from_json(json: &str) -> LicenseResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Checks that the configuration can produce usable identifiers and codes.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidConfig`] for an empty secret or a
    /// prefix that is empty or not upper-case ASCII alphanumeric.
    pub fn validate(&self) -> LicenseResult<()> {
        if self.secret.is_empty() {
            return Err(LicenseError::InvalidConfig("secret must not be empty".into()));
        }
        if self.device_prefix.is_empty()
            || !self
                .device_prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(LicenseError::InvalidConfig(format!(
                "device prefix {:?} must be upper-case ASCII alphanumeric",
                self.device_prefix
            )));
        }
        Ok(())
    }
}
