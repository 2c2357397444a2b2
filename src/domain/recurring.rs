use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entry::Tag;
use crate::domain::ids::generate_id;

/// Per-user reusable expense definition, applied once to every month
/// created after it exists. Never owned by a month and never retroactive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tag: Tag,
    pub created_at: DateTime<Utc>,
}

impl RecurringTemplate {
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        note: impl Into<String>,
        tag: Tag,
    ) -> Self {
        Self {
            id: generate_id("rec"),
            user_id: user_id.into(),
            category: category.into(),
            amount,
            note: note.into(),
            tag,
            created_at: Utc::now(),
        }
    }
}
