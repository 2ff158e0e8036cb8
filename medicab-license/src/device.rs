//! Per-installation device identity.
//!
//! The identifier is the only device-specific input to code derivation, so
//! once written it is never regenerated. It is short enough to read out over
//! the phone: `MED-` followed by four upper-case base-36 characters.

use crate::error::LicenseResult;
use crate::store::{Store, keys};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Alphabet of the random segment.
pub const DEVICE_ID_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random segment.
pub const DEVICE_ID_RANDOM_LEN: usize = 4;

/// A stable identifier for this installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Generates a fresh identifier with the given prefix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        Self::generate_with(prefix, &mut rand::thread_rng())
    }

    /// Generates an identifier drawing randomness from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Self {
        let segment: String = (0..DEVICE_ID_RANDOM_LEN)
            .map(|_| char::from(DEVICE_ID_ALPHABET[rng.gen_range(0..DEVICE_ID_ALPHABET.len())]))
            .collect();
        Self(format!("{prefix}-{segment}"))
    }

    /// The identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reads or lazily creates the installation's [`DeviceId`].
#[derive(Debug)]
pub struct DeviceIdentity<'a, S: Store + ?Sized> {
    store: &'a S,
    prefix: &'a str,
}

impl<'a, S: Store + ?Sized> DeviceIdentity<'a, S> {
    /// Binds the provider to a store and identifier prefix.
    pub fn new(store: &'a S, prefix: &'a str) -> Self {
        Self { store, prefix }
    }

    /// Returns the persisted identifier, creating and persisting one first
    /// if none exists.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn device_id(&self) -> LicenseResult<DeviceId> {
        if let Some(existing) = self.stored()? {
            return Ok(existing);
        }

        let id = DeviceId::generate(self.prefix);
        self.store.set(keys::DEVICE_ID, id.as_str())?;
        info!(device_id = %id, "Generated new device identifier");
        Ok(id)
    }

    /// Returns the persisted identifier without creating one.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn stored(&self) -> LicenseResult<Option<DeviceId>> {
        Ok(self
            .store
            .get(keys::DEVICE_ID)?
            .filter(|id| !id.trim().is_empty())
            .map(DeviceId::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let id = DeviceId::generate_with("MED", &mut rng);
            let s = id.as_str();
            assert_eq!(s.len(), 8);
            assert!(s.starts_with("MED-"));
            assert!(s[4..].bytes().all(|b| DEVICE_ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn display_matches_inner() {
        let id = DeviceId::from("MED-A1B2");
        assert_eq!(id.to_string(), "MED-A1B2");
        assert_eq!(id.as_ref(), "MED-A1B2");
    }
}
