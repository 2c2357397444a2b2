use serde::{Deserialize, Serialize};

use crate::domain::entry::Entry;
use crate::domain::ids::generate_id;

/// Named bucket of entries on one side of a month.
///
/// `entries: None` is the legacy flat representation that pre-dates
/// itemized entries: a bare `amount` plus a free-text `comment`. The
/// legacy shape counts as one implicit entry; [`Category::ensure_itemized`]
/// makes that conversion explicit before any merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    #[serde(rename = "category")]
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<Entry>>,
}

impl Category {
    /// Creates an itemized category holding a single entry.
    pub fn with_entry(id_prefix: &str, name: impl Into<String>, entry: Entry) -> Self {
        let mut category = Self {
            id: generate_id(id_prefix),
            name: name.into(),
            amount: 0.0,
            comment: String::new(),
            entries: Some(vec![entry]),
        };
        category.recompute();
        category
    }

    /// Creates a flat legacy category with no entry list.
    pub fn legacy(
        id_prefix: &str,
        name: impl Into<String>,
        amount: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(id_prefix),
            name: name.into(),
            amount,
            comment: comment.into(),
            entries: None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.entries.is_none()
    }

    /// Converts the legacy flat shape into the itemized shape, synthesizing
    /// one entry from the stored amount and comment.
    pub fn ensure_itemized(&mut self) -> &mut Vec<Entry> {
        let amount = self.amount;
        let comment = self.comment.clone();
        self.entries
            .get_or_insert_with(|| vec![Entry::new(amount, comment, None)])
    }

    /// Restores the derived fields of an itemized category: `amount` as the
    /// sum of its entries and `comment` as the joined breakdown string.
    /// Legacy categories keep their flat fields untouched.
    pub fn recompute(&mut self) {
        if let Some(entries) = &self.entries {
            self.amount = entries.iter().map(|entry| entry.amount).sum();
            self.comment = entries
                .iter()
                .map(Entry::breakdown_fragment)
                .collect::<Vec<_>>()
                .join("+");
        }
    }
}
