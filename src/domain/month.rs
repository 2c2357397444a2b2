use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::ids::generate_id;

/// Fixed table backing `monthName` derivation; indexed by month index 0-11.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Aggregate root: one user's ledger for a single calendar month.
///
/// Uniquely identified by `(user_id, year, month)`; `year`, `month`, and
/// `user_id` never change after creation. The three derived totals are
/// restored by the recalculator after every mutation, so they always match
/// the category lists when the document is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Month {
    pub id: String,
    pub user_id: String,
    pub month_name: String,
    pub year: i32,
    /// Month index, 0 (January) through 11 (December).
    pub month: u32,
    #[serde(default)]
    pub income: Vec<Category>,
    #[serde(default)]
    pub expenses: Vec<Category>,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub carry_forward: f64,
    /// Optimistic-concurrency stamp, bumped by the store on every update.
    #[serde(default)]
    pub version: u64,
}

impl Month {
    /// Creates an empty month. The caller validates the month index.
    pub fn new(user_id: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            id: generate_id("month"),
            user_id: user_id.into(),
            month_name: display_name(year, month),
            year,
            month,
            income: Vec::new(),
            expenses: Vec::new(),
            total_income: 0.0,
            total_expense: 0.0,
            carry_forward: 0.0,
            version: 0,
        }
    }
}

/// `"January 2025"` style display name for a `(year, month index)` pair.
pub fn display_name(year: i32, month: u32) -> String {
    let name = MONTH_NAMES.get(month as usize).copied().unwrap_or("Unknown");
    format!("{} {}", name, year)
}

/// The chronologically preceding `(year, month index)` pair.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 0 {
        (year - 1, 11)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_fixed_table() {
        assert_eq!(display_name(2025, 0), "January 2025");
        assert_eq!(display_name(2024, 11), "December 2024");
    }

    #[test]
    fn previous_month_wraps_the_year_boundary() {
        assert_eq!(previous_month(2025, 0), (2024, 11));
        assert_eq!(previous_month(2025, 5), (2025, 4));
    }

    #[test]
    fn wire_layout_matches_persisted_documents() {
        let month = Month::new("user-1", 2025, 2);
        let json = serde_json::to_value(&month).expect("serialize");
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["monthName"], "March 2025");
        assert_eq!(json["totalIncome"], 0.0);
        assert_eq!(json["carryForward"], 0.0);
    }
}
