//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
///
/// A rejected activation code is not an error: [`LicenseManager::activate`]
/// reports it as `Ok(false)` so the caller can show an inline message and
/// let the user retry.
///
/// [`LicenseManager::activate`]: crate::LicenseManager::activate
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The backing store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem error from the file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file or configuration JSON is malformed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
