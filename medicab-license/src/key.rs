//! Activation code derivation and validation.
//!
//! Codes are a pure function of the device identifier and the shared secret:
//!
//! 1. `source = "{device_id}-{secret}"`
//! 2. 32-bit rolling hash over the UTF-16 code units of `source`
//!    (`hash = hash * 31 + unit`, wrapping as a signed 32-bit integer)
//! 3. the decimal digits of `|hash|` become positional offsets
//! 4. 16 characters are picked from [`CODE_ALPHABET`] and grouped `XXXX-XXXX-XXXX-XXXX`
//!
//! The wraparound arithmetic must stay bit-for-bit identical to the codes
//! already issued by the vendor tool, so it goes through `i32::wrapping_*`.
//!
//! This is a shared-secret scheme over a non-cryptographic hash. It keeps
//! honest users honest and nothing more.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Output alphabet (no `I`, `O`, `0`, `1`).
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of code characters, excluding separators.
pub const CODE_CHARS: usize = 16;

/// Characters per group.
pub const GROUP_SIZE: usize = 4;

/// Formatted length: 16 characters plus 3 separators.
pub const CODE_LENGTH: usize = CODE_CHARS + CODE_CHARS / GROUP_SIZE - 1;

const GROUP_SEPARATOR: char = '-';
const SOURCE_SEPARATOR: char = '-';

/// A formatted activation code such as `HGHJ-GMPK-RQRS-QVXT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Derives the code for `device_id` under `secret`.
    #[must_use]
    pub fn derive(device_id: &str, secret: &str) -> Self {
        let source = format!("{device_id}{SOURCE_SEPARATOR}{secret}");
        let hash = rolling_hash(&source);
        let digits: Vec<usize> = hash
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| usize::from(b - b'0'))
            .collect();

        let mut code = String::with_capacity(CODE_LENGTH);
        for i in 0..CODE_CHARS {
            let index = (i + digits[i % digits.len()]) % CODE_ALPHABET.len();
            code.push(char::from(CODE_ALPHABET[index]));
            if (i + 1) % GROUP_SIZE == 0 && i + 1 != CODE_CHARS {
                code.push(GROUP_SEPARATOR);
            }
        }

        debug!(device_id, "Derived activation code");
        Self(code)
    }

    /// Returns true if `submitted` matches the code derived for `device_id`,
    /// ignoring surrounding whitespace and letter case.
    #[must_use]
    pub fn validate(submitted: &str, device_id: &str, secret: &str) -> bool {
        Self::derive(device_id, secret).matches(submitted)
    }

    /// Case- and whitespace-insensitive comparison against user input.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        normalize(submitted) == self.0
    }

    /// The formatted code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code, returning the formatted string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ActivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActivationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the formatted activation code for `device_id` under `secret`.
#[must_use]
pub fn derive_key(device_id: &str, secret: &str) -> String {
    ActivationCode::derive(device_id, secret).into_string()
}

/// Checks a submitted code against `device_id` and `secret`.
#[must_use]
pub fn validate_key(submitted: &str, device_id: &str, secret: &str) -> bool {
    ActivationCode::validate(submitted, device_id, secret)
}

/// Trims and upper-cases user input. Inner separators are kept as typed.
#[must_use]
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

/// 31-multiplier string hash with signed 32-bit wraparound at every step.
///
/// Operates on UTF-16 code units so non-ASCII identifiers hash the same way
/// they do in the vendor tooling.
#[must_use]
pub fn rolling_hash(source: &str) -> i32 {
    source.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}
