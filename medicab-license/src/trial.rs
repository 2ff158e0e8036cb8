//! Trial window bookkeeping.
//!
//! The first-run timestamp is written once; only an unparseable value is
//! ever replaced, by the next `init_first_run`. Elapsed time is the
//! *absolute* distance between now and first run: rolling the system clock
//! back before the first run therefore lengthens the trial instead of
//! failing it. That matches the shipped behaviour and is kept
//! until a product decision says otherwise.

use crate::clock::{Clock, MS_PER_DAY};
use crate::error::LicenseResult;
use crate::store::{Store, keys};
use tracing::{debug, info, warn};

/// Trial window over a store and a clock.
#[derive(Debug)]
pub struct TrialClock<'a, S: Store + ?Sized, C: Clock + ?Sized> {
    store: &'a S,
    clock: &'a C,
    trial_days: u32,
}

impl<'a, S: Store + ?Sized, C: Clock + ?Sized> TrialClock<'a, S, C> {
    /// Binds the trial window to a store, a clock and a length in days.
    pub fn new(store: &'a S, clock: &'a C, trial_days: u32) -> Self {
        Self {
            store,
            clock,
            trial_days,
        }
    }

    /// Records the current time as first run unless a valid one is stored.
    ///
    /// An unparseable stored value is replaced, so the window starts now
    /// instead of staying open forever.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn init_first_run(&self) -> LicenseResult<()> {
        if self.first_run()?.is_some() {
            return Ok(());
        }
        let now = self.clock.now_millis();
        self.store.set(keys::FIRST_RUN, &now.to_string())?;
        info!(first_run = now, "Trial started");
        Ok(())
    }

    /// The stored first-run timestamp. Unparseable values read as absent.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn first_run(&self) -> LicenseResult<Option<i64>> {
        let Some(raw) = self.store.get(keys::FIRST_RUN)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(ts) => Ok(Some(ts)),
            Err(_) => {
                warn!(value = %raw, "Ignoring corrupted first-run timestamp");
                Ok(None)
            }
        }
    }

    /// Fractional days since first run, or `None` before first run.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn elapsed_days(&self) -> LicenseResult<Option<f64>> {
        Ok(self.first_run()?.map(|first_run| {
            let diff = self.clock.now_millis().abs_diff(first_run);
            diff as f64 / MS_PER_DAY as f64
        }))
    }

    /// Whole days left, rounded up, never negative. The full window is
    /// reported while no first run is recorded.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn days_remaining(&self) -> LicenseResult<u32> {
        let Some(elapsed) = self.elapsed_days()? else {
            return Ok(self.trial_days);
        };
        let remaining = (f64::from(self.trial_days) - elapsed).ceil().max(0.0);
        debug!(elapsed, remaining, "Computed trial days remaining");
        Ok(remaining as u32)
    }

    /// True while `ceil(elapsed_days) <= trial_days` (inclusive boundary),
    /// or when no first run is recorded.
    ///
    /// # Errors
    ///
    /// Only store failures are reported.
    pub fn is_within_trial(&self) -> LicenseResult<bool> {
        Ok(match self.elapsed_days()? {
            Some(elapsed) => elapsed.ceil() <= f64::from(self.trial_days),
            None => true,
        })
    }
}
