use crate::domain::category::Category;

/// Read-side grouping of a raw category list for display.
///
/// Duplicate names (reachable through the legacy endpoints, which never
/// merge) collapse into one category, legacy flat categories become a
/// single synthetic entry, and categories with zero amount and no entries
/// are dropped. The stored list is never mutated, and reapplying the
/// projection to its own output yields the same result.
pub fn group_for_display(categories: &[Category]) -> Vec<Category> {
    let mut grouped: Vec<Category> = Vec::new();
    for category in categories {
        let empty = category
            .entries
            .as_ref()
            .map_or(true, |entries| entries.is_empty());
        if category.amount == 0.0 && empty {
            continue;
        }
        let mut normalized = category.clone();
        normalized.ensure_itemized();
        match grouped
            .iter_mut()
            .find(|existing| existing.name == normalized.name)
        {
            Some(existing) => {
                existing
                    .ensure_itemized()
                    .extend(normalized.entries.take().into_iter().flatten());
                existing.recompute();
            }
            None => {
                normalized.recompute();
                grouped.push(normalized);
            }
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::group_for_display;
    use crate::domain::{Category, Entry};

    #[test]
    fn merges_duplicate_names_from_legacy_paths() {
        let raw = vec![
            Category::legacy("inc", "Salary", 3000.0, "base"),
            Category::with_entry("inc", "Salary", Entry::new(500.0, "bonus", None)),
        ];
        let grouped = group_for_display(&raw);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].amount, 3500.0);
        let entries = grouped[0].entries.as_ref().expect("itemized");
        assert_eq!(entries.len(), 2);
        assert!(grouped[0].comment.contains("3000(base)"));
        assert!(grouped[0].comment.contains("500(bonus)"));
    }

    #[test]
    fn drops_zero_amount_categories_without_entries() {
        let raw = vec![
            Category::legacy("exp", "Placeholder", 0.0, ""),
            Category::legacy("exp", "Rent", 900.0, "rent"),
        ];
        let grouped = group_for_display(&raw);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].name, "Rent");
    }

    #[test]
    fn projection_is_idempotent_and_non_mutating() {
        let raw = vec![
            Category::legacy("exp", "Rent", 900.0, "rent"),
            Category::with_entry("exp", "Food", Entry::new(120.0, "lunch", None)),
            Category::with_entry("exp", "Food", Entry::new(60.0, "snacks", None)),
        ];
        let before = raw.clone();
        let first = group_for_display(&raw);
        assert_eq!(raw, before, "input must stay untouched");

        let second = group_for_display(&first);
        assert_eq!(first, second);
    }
}
