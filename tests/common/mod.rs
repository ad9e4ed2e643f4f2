#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use subtrack::core::SubscriptionManager;
use subtrack::domain::{BillingCycle, NewSubscription};
use subtrack::services::FixedClock;
use subtrack::storage::JsonSubscriptionStorage;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Manager over a fresh JSON store with the clock pinned to `today`.
pub fn setup_manager(today: NaiveDate) -> (SubscriptionManager, PathBuf) {
    let root = temp_root();
    let storage = JsonSubscriptionStorage::with_retention(root.clone(), 3).expect("create json storage");
    let manager = SubscriptionManager::new(Box::new(storage), Box::new(FixedClock::at_date(today)));
    (manager, root)
}

pub fn draft(name: &str, cost: f64, cycle: BillingCycle, start: NaiveDate) -> NewSubscription {
    NewSubscription::new(name, cost, cycle, start)
}
