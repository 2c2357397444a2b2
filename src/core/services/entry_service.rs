//! Itemized entry mutations against one month document.

use tracing::debug;

use crate::core::services::{validate_category_name, validate_positive_amount, Side};
use crate::domain::category::Category;
use crate::domain::entry::{Entry, Tag};
use crate::domain::month::Month;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::totals;

/// Applies single-entry mutations while preserving the name-keyed
/// category-merge invariant: at most one category per name on a side, a
/// category's amount equal to the sum of its entries, and a category
/// removed as soon as its last entry goes.
pub struct EntryService;

impl EntryService {
    /// Appends an entry to the category named `category_name`, merging into
    /// an existing category of that name or creating a new one. Legacy flat
    /// categories are itemized first, so their stored amount survives as one
    /// implicit entry.
    pub fn add_entry(
        month: &mut Month,
        side: Side,
        category_name: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<()> {
        validate_positive_amount(amount)?;
        validate_category_name(category_name)?;

        let tag = match side {
            Side::Income => None,
            Side::Expense => Some(tag.unwrap_or_default()),
        };
        let entry = Entry::new(amount, note, tag);
        let categories = side.categories_mut(month);
        match categories
            .iter_mut()
            .find(|category| category.name == category_name)
        {
            Some(category) => {
                category.ensure_itemized().push(entry);
                category.recompute();
            }
            None => {
                categories.push(Category::with_entry(side.id_prefix(), category_name, entry));
            }
        }
        totals::recalculate(month);
        debug!(
            side = side.label(),
            category = category_name,
            amount,
            "added entry"
        );
        Ok(())
    }

    /// Replaces an entry's amount, note, and (for expenses) tag. An omitted
    /// tag keeps the entry's existing tag rather than resetting it.
    pub fn edit_entry(
        month: &mut Month,
        side: Side,
        entry_id: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<()> {
        validate_positive_amount(amount)?;

        let categories = side.categories_mut(month);
        let mut found = false;
        'search: for category in categories.iter_mut() {
            let Some(entries) = category.entries.as_mut() else {
                continue;
            };
            for entry in entries.iter_mut() {
                if entry.id == entry_id {
                    entry.amount = amount;
                    entry.note = note.to_string();
                    if side == Side::Expense {
                        if let Some(tag) = tag {
                            entry.tag = Some(tag);
                        }
                    }
                    category.recompute();
                    found = true;
                    break 'search;
                }
            }
        }
        if !found {
            return Err(LedgerError::NotFound(format!(
                "{} entry {entry_id}",
                side.label()
            )));
        }
        totals::recalculate(month);
        Ok(())
    }

    /// Removes an entry; the parent category goes with it when the removal
    /// empties its entry list.
    pub fn delete_entry(month: &mut Month, side: Side, entry_id: &str) -> LedgerResult<()> {
        let categories = side.categories_mut(month);
        let mut location = None;
        for (category_idx, category) in categories.iter().enumerate() {
            if let Some(entries) = &category.entries {
                if let Some(entry_idx) = entries.iter().position(|entry| entry.id == entry_id) {
                    location = Some((category_idx, entry_idx));
                    break;
                }
            }
        }
        let Some((category_idx, entry_idx)) = location else {
            return Err(LedgerError::NotFound(format!(
                "{} entry {entry_id}",
                side.label()
            )));
        };

        let category = &mut categories[category_idx];
        let mut emptied = false;
        if let Some(entries) = category.entries.as_mut() {
            entries.remove(entry_idx);
            emptied = entries.is_empty();
        }
        if emptied {
            categories.remove(category_idx);
        } else {
            category.recompute();
        }
        totals::recalculate(month);
        Ok(())
    }
}
