//! Medicab license generator
//!
//! Offline vendor tool: turns a customer's device identifier into the
//! activation code the application expects.
//!
//! Usage:
//!   medicab-keygen MED-A1B2

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "medicab-keygen")]
#[command(version, about = "Generate a Medicab activation code for a device identifier")]
struct Args {
    /// Device identifier shown on the customer's activation screen
    device_id: String,
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let Some(issued) = medicab_keygen::issue(&args.device_id) else {
        Args::command()
            .error(ErrorKind::InvalidValue, "device identifier must not be blank")
            .exit();
    };

    debug!(device_id = %issued.device_id, "Issued activation code");
    let banner = if std::io::stdout().is_terminal() {
        medicab_keygen::render_banner_highlighted(&issued)
    } else {
        medicab_keygen::render_banner(&issued)
    };
    print!("{banner}");
    Ok(())
}
