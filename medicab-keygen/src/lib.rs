//! Vendor-side activation code generation.
//!
//! The customer reads their device identifier (e.g. `MED-A1B2`) off the
//! activation screen; the vendor runs `medicab-keygen <DEVICE_ID>` and reads
//! back the code. Derivation is shared with the application through
//! [`medicab_license::ActivationCode::derive`].

use medicab_license::{ActivationCode, DEFAULT_SECRET};

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// A code issued for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub device_id: String,
    pub code: ActivationCode,
}

/// Derives the code for `device_id` with the shipped secret.
///
/// Surrounding whitespace is trimmed; `None` if nothing is left.
#[must_use]
pub fn issue(device_id: &str) -> Option<IssuedCode> {
    issue_with_secret(device_id, DEFAULT_SECRET)
}

/// Derives the code for `device_id` with an explicit secret.
#[must_use]
pub fn issue_with_secret(device_id: &str, secret: &str) -> Option<IssuedCode> {
    let device_id = device_id.trim();
    if device_id.is_empty() {
        return None;
    }
    Some(IssuedCode {
        device_id: device_id.to_string(),
        code: ActivationCode::derive(device_id, secret),
    })
}

/// The human-readable banner printed to stdout.
#[must_use]
pub fn render_banner(issued: &IssuedCode) -> String {
    banner(issued, &format!("LICENSE KEY: {}", issued.code))
}

/// Same banner with the license key line in green, for terminals.
#[must_use]
pub fn render_banner_highlighted(issued: &IssuedCode) -> String {
    banner(issued, &format!("{GREEN}LICENSE KEY: {}{RESET}", issued.code))
}

fn banner(issued: &IssuedCode, key_line: &str) -> String {
    format!(
        "\n{RULE}\nMEDICABINET PRO - LICENSE GENERATOR\n{RULE}\n\
         Device ID:   {}\nSecret:      ***SECURE***\n{THIN_RULE}\n\
         {key_line}\n{RULE}\n",
        issued.device_id
    )
}
