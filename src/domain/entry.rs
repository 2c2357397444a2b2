use serde::{Deserialize, Serialize};

use crate::domain::ids::generate_id;

/// Classifies an expense entry for breakdown analytics.
/// Income entries never carry a tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Need,
    Want,
    #[default]
    Neutral,
}

/// One atomic transaction line inside a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

impl Entry {
    pub fn new(amount: f64, note: impl Into<String>, tag: Option<Tag>) -> Self {
        Self {
            id: generate_id("entry"),
            amount,
            note: note.into(),
            tag,
        }
    }

    /// Breakdown fragment in the `amount(note)` display format.
    pub fn breakdown_fragment(&self) -> String {
        let note = if self.note.is_empty() {
            "No note"
        } else {
            self.note.as_str()
        };
        format!("{}({})", self.amount, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_fragment_defaults_empty_notes() {
        let noted = Entry::new(250.5, "groceries", None);
        assert_eq!(noted.breakdown_fragment(), "250.5(groceries)");

        let silent = Entry::new(40.0, "", Some(Tag::Want));
        assert_eq!(silent.breakdown_fragment(), "40(No note)");
    }
}
