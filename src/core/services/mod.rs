pub mod category_service;
pub mod entry_service;

pub use category_service::CategoryService;
pub use entry_service::EntryService;

use crate::domain::category::Category;
use crate::domain::month::Month;
use crate::errors::{LedgerError, LedgerResult};

/// Selects which side of a month a mutation targets. The income and
/// expense entry id spaces are independent; a lookup never crosses sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Income,
    Expense,
}

impl Side {
    pub fn categories<'a>(&self, month: &'a Month) -> &'a [Category] {
        match self {
            Side::Income => &month.income,
            Side::Expense => &month.expenses,
        }
    }

    pub fn categories_mut<'a>(&self, month: &'a mut Month) -> &'a mut Vec<Category> {
        match self {
            Side::Income => &mut month.income,
            Side::Expense => &mut month.expenses,
        }
    }

    /// Document id prefix for categories created on this side.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Side::Income => "inc",
            Side::Expense => "exp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Income => "income",
            Side::Expense => "expense",
        }
    }
}

pub(crate) fn validate_positive_amount(amount: f64) -> LedgerResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::Validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_category_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "category name must not be empty".into(),
        ));
    }
    Ok(())
}
