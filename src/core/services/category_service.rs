//! Whole-category mutations, including the flat legacy surface kept for
//! pre-itemized data.

use crate::core::services::{validate_category_name, Side};
use crate::domain::category::Category;
use crate::domain::month::Month;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::totals;

/// Category-level operations on one month document.
///
/// The legacy add/edit paths deliberately skip the name-keyed merge the
/// entry-based API performs; two same-named categories can coexist through
/// this surface, and the display projection is what collapses them.
pub struct CategoryService;

impl CategoryService {
    /// Removes an entire category and all of its entries.
    pub fn delete_category(month: &mut Month, side: Side, category_id: &str) -> LedgerResult<()> {
        let categories = side.categories_mut(month);
        let before = categories.len();
        categories.retain(|category| category.id != category_id);
        if categories.len() == before {
            return Err(LedgerError::NotFound(format!(
                "{} category {category_id}",
                side.label()
            )));
        }
        totals::recalculate(month);
        Ok(())
    }

    /// Legacy flat append: the comment is stored verbatim and no merge with
    /// an existing same-named category happens.
    pub fn add_legacy(
        month: &mut Month,
        side: Side,
        category_name: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<()> {
        validate_category_name(category_name)?;
        validate_legacy_amount(amount)?;
        side.categories_mut(month).push(Category::legacy(
            side.id_prefix(),
            category_name,
            amount,
            comment,
        ));
        totals::recalculate(month);
        Ok(())
    }

    /// Legacy overwrite: replaces name, amount, and comment in place,
    /// leaving any entry list untouched.
    pub fn edit_legacy(
        month: &mut Month,
        side: Side,
        category_id: &str,
        category_name: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<()> {
        validate_category_name(category_name)?;
        validate_legacy_amount(amount)?;
        let categories = side.categories_mut(month);
        let Some(category) = categories
            .iter_mut()
            .find(|category| category.id == category_id)
        else {
            return Err(LedgerError::NotFound(format!(
                "{} category {category_id}",
                side.label()
            )));
        };
        category.name = category_name.to_string();
        category.amount = amount;
        category.comment = comment.to_string();
        totals::recalculate(month);
        Ok(())
    }
}

// The legacy surface accepts zero amounts (placeholder rows exist in old
// data); the entry surface does not.
fn validate_legacy_amount(amount: f64) -> LedgerResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::Validation(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_add_never_merges_same_named_categories() {
        let mut month = Month::new("user-1", 2025, 1);
        CategoryService::add_legacy(&mut month, Side::Expense, "Rent", 500.0, "first half")
            .expect("add");
        CategoryService::add_legacy(&mut month, Side::Expense, "Rent", 400.0, "second half")
            .expect("add");
        assert_eq!(month.expenses.len(), 2);
        assert_eq!(month.total_expense, 900.0);
    }

    #[test]
    fn legacy_edit_overwrites_without_touching_entries() {
        let mut month = Month::new("user-1", 2025, 1);
        CategoryService::add_legacy(&mut month, Side::Income, "Salary", 3000.0, "base")
            .expect("add");
        let id = month.income[0].id.clone();

        CategoryService::edit_legacy(&mut month, Side::Income, &id, "Wages", 3200.0, "raised")
            .expect("edit");
        assert_eq!(month.income[0].name, "Wages");
        assert_eq!(month.income[0].amount, 3200.0);
        assert!(month.income[0].is_legacy());
        assert_eq!(month.total_income, 3200.0);
    }

    #[test]
    fn delete_category_signals_not_found() {
        let mut month = Month::new("user-1", 2025, 1);
        let err = CategoryService::delete_category(&mut month, Side::Income, "inc-missing")
            .expect_err("missing category");
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
