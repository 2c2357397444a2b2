#![doc(test(attr(deny(warnings))))]

//! Monthbook keeps one ledger document per user and calendar month, with
//! itemized income and expense categories, derived totals, carry-forward
//! between consecutive months, recurring expense templates, and cached
//! insight reports.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Monthbook tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
