#![allow(dead_code)]

use std::sync::Mutex;

use monthbook::core::{MonthManager, RecurringService};
use monthbook::storage::{JsonStore, MemoryStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Managers over a shared in-memory store; the returned store handle sees
/// everything the managers write.
pub fn memory_managers() -> (MonthManager, RecurringService, MemoryStore) {
    let store = MemoryStore::new();
    let manager = MonthManager::new(Box::new(store.clone()), Box::new(store.clone()));
    let recurring = RecurringService::new(Box::new(store.clone()));
    (manager, recurring, store)
}

/// A JSON store in an isolated directory that outlives the test body.
pub fn json_store() -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonStore::new(temp.path()).expect("create json store");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    store
}
