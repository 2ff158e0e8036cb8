mod common;

use common::{Harness, NOW, days};
use medicab_license::{LicenseConfig, LicenseStatus, ManualClock, MemoryStore, Store, TrialClock, keys};

// ── First run ────────────────────────────────────────────────────

#[test]
fn init_first_run_records_now() {
    let h = Harness::new(LicenseConfig::default());
    h.manager.init_first_run().unwrap();
    assert_eq!(h.store.get(keys::FIRST_RUN).unwrap(), Some(NOW.to_string()));
}

#[test]
fn init_first_run_is_idempotent() {
    let h = Harness::new(LicenseConfig::default());
    h.manager.init_first_run().unwrap();

    h.clock.advance(days(3));
    h.manager.init_first_run().unwrap();
    h.manager.init_first_run().unwrap();

    assert_eq!(h.store.get(keys::FIRST_RUN).unwrap(), Some(NOW.to_string()));
    assert_eq!(h.manager.trial_days_remaining().unwrap(), 4);
}

#[test]
fn missing_first_run_means_full_trial() {
    let h = Harness::new(LicenseConfig::default());
    assert_eq!(h.manager.trial_days_remaining().unwrap(), 7);
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Trial);
    assert!(h.store.get(keys::FIRST_RUN).unwrap().is_none());
}

// ── Boundary ─────────────────────────────────────────────────────

#[test]
fn exactly_seven_days_is_still_trial() {
    let h = Harness::new(LicenseConfig::default());
    h.store.set(keys::FIRST_RUN, &(NOW - days(7)).to_string()).unwrap();

    assert_eq!(h.manager.trial_days_remaining().unwrap(), 0);
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Trial);
    assert!(h.manager.can_access_app().unwrap());
}

#[test]
fn one_millisecond_past_seven_days_is_expired() {
    let h = Harness::new(LicenseConfig::default());
    h.store.set(keys::FIRST_RUN, &(NOW - days(7) - 1).to_string()).unwrap();

    assert_eq!(h.manager.trial_days_remaining().unwrap(), 0);
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Expired);
    assert!(!h.manager.can_access_app().unwrap());
}

#[test]
fn days_remaining_counts_down() {
    let h = Harness::new(LicenseConfig::default());
    h.manager.init_first_run().unwrap();

    let expected = [7, 6, 5, 4, 3, 2, 1, 0];
    for (day, want) in expected.into_iter().enumerate() {
        h.clock.set(NOW + days(day as i64));
        assert_eq!(h.manager.trial_days_remaining().unwrap(), want, "day {day}");
    }

    h.clock.set(NOW + days(30));
    assert_eq!(h.manager.trial_days_remaining().unwrap(), 0);
}

#[test]
fn configured_trial_length() {
    let config = LicenseConfig {
        trial_days: 14,
        ..LicenseConfig::default()
    };
    let h = Harness::new(config);
    h.manager.init_first_run().unwrap();
    h.clock.advance(days(10));
    assert_eq!(h.manager.trial_days_remaining().unwrap(), 4);
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Trial);
}

// ── Clock rollback ───────────────────────────────────────────────

#[test]
fn clock_rolled_back_counts_absolute_distance() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW);
    let trial = TrialClock::new(&store, &clock, 7);
    trial.init_first_run().unwrap();

    clock.set(NOW - days(2));
    assert_eq!(trial.elapsed_days().unwrap(), Some(2.0));
    assert_eq!(trial.days_remaining().unwrap(), 5);
    assert!(trial.is_within_trial().unwrap());

    clock.set(NOW - days(8));
    assert!(!trial.is_within_trial().unwrap());
}

#[test]
fn corrupted_first_run_is_replaced_on_init() {
    let h = Harness::with_store(
        MemoryStore::with_entries([(keys::FIRST_RUN, "garbage")]),
        LicenseConfig::default(),
    );
    h.manager.init_first_run().unwrap();
    assert_eq!(h.store.get(keys::FIRST_RUN).unwrap(), Some(NOW.to_string()));
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Trial);

    h.clock.advance(days(3650));
    h.manager.init_first_run().unwrap();
    assert_eq!(h.store.get(keys::FIRST_RUN).unwrap(), Some(NOW.to_string()));
    assert_eq!(h.manager.license_status().unwrap(), LicenseStatus::Expired);
    assert_eq!(h.manager.trial_days_remaining().unwrap(), 0);
}
