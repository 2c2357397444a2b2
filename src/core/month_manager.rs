use tracing::{info, warn};

use crate::core::services::{CategoryService, EntryService, Side};
use crate::domain::category::Category;
use crate::domain::entry::{Entry, Tag};
use crate::domain::month::{previous_month, Month};
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::totals;
use crate::storage::{MonthStore, TemplateStore};

/// Income category name used when a surplus is carried into a new month.
pub const CARRY_FORWARD_CATEGORY: &str = "Carry Forward";

/// Facade that coordinates month documents between the mutation services
/// and the backing stores.
///
/// Every mutation is a whole-document read-modify-write: load the month,
/// apply the service operation, let the recalculator restore the totals,
/// then persist through the store's version check. A mutation either
/// completes fully or reports an error with no partial effect.
pub struct MonthManager {
    months: Box<dyn MonthStore>,
    templates: Box<dyn TemplateStore>,
}

impl MonthManager {
    pub fn new(months: Box<dyn MonthStore>, templates: Box<dyn TemplateStore>) -> Self {
        Self { months, templates }
    }

    /// Creates the month for `(user_id, year, month)`, seeding income from
    /// the previous month's positive carry-forward and expenses from the
    /// user's recurring templates.
    ///
    /// The document is assembled fully in memory before the single store
    /// insert, so a failed lookup or seed never leaves a partial month
    /// behind. A non-positive carry-forward seeds nothing; debt is not
    /// carried into the new month.
    pub fn create_month(&self, user_id: &str, year: i32, month: u32) -> LedgerResult<Month> {
        if user_id.trim().is_empty() {
            return Err(LedgerError::Validation("user id must not be empty".into()));
        }
        if month > 11 {
            return Err(LedgerError::Validation(format!(
                "month index {month} out of range 0-11"
            )));
        }
        if self.months.find_month(user_id, year, month)?.is_some() {
            return Err(LedgerError::Conflict("Month already exists".into()));
        }

        let (prev_year, prev_month) = previous_month(year, month);
        let carry_in = self
            .months
            .find_month(user_id, prev_year, prev_month)?
            .map(|previous| previous.carry_forward)
            .unwrap_or(0.0);

        let mut created = Month::new(user_id, year, month);
        if carry_in > 0.0 {
            created
                .income
                .push(Category::legacy("inc", CARRY_FORWARD_CATEGORY, carry_in, ""));
        } else if carry_in < 0.0 {
            info!(user_id, year, month, carry_in, "dropping negative carry-forward");
        }

        for template in self.templates.list_templates(user_id)? {
            let entry = Entry::new(template.amount, template.note.clone(), Some(template.tag));
            let mut category = Category::with_entry("exp", template.category.clone(), entry);
            category.comment = format!("{}({})", template.amount, template.note);
            created.expenses.push(category);
        }

        totals::recalculate(&mut created);
        let persisted = self.months.insert_month(&created)?;
        info!(user_id, year, month, "created {}", persisted.month_name);
        Ok(persisted)
    }

    pub fn month(&self, month_id: &str) -> LedgerResult<Month> {
        self.months
            .find_month_by_id(month_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("month {month_id}")))
    }

    /// All months of one user, newest first.
    pub fn months_for_user(&self, user_id: &str) -> LedgerResult<Vec<Month>> {
        let mut months = self.months.list_months(user_id)?;
        months.sort_by(|a, b| b.year.cmp(&a.year).then(b.month.cmp(&a.month)));
        Ok(months)
    }

    /// Deletes a month and, through document ownership, every category and
    /// entry inside it.
    pub fn delete_month(&self, month_id: &str) -> LedgerResult<()> {
        let month = self.month(month_id)?;
        self.months.delete_month(month_id)?;
        warn!(
            user_id = %month.user_id,
            month_name = %month.month_name,
            "deleted month"
        );
        Ok(())
    }

    pub fn add_income_entry(
        &self,
        month_id: &str,
        category: &str,
        amount: f64,
        note: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::add_entry(month, Side::Income, category, amount, note, None)
        })
    }

    pub fn add_expense_entry(
        &self,
        month_id: &str,
        category: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::add_entry(month, Side::Expense, category, amount, note, tag)
        })
    }

    pub fn edit_income_entry(
        &self,
        entry_id: &str,
        month_id: &str,
        amount: f64,
        note: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::edit_entry(month, Side::Income, entry_id, amount, note, None)
        })
    }

    pub fn edit_expense_entry(
        &self,
        entry_id: &str,
        month_id: &str,
        amount: f64,
        note: &str,
        tag: Option<Tag>,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::edit_entry(month, Side::Expense, entry_id, amount, note, tag)
        })
    }

    pub fn delete_income_entry(&self, entry_id: &str, month_id: &str) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::delete_entry(month, Side::Income, entry_id)
        })
    }

    pub fn delete_expense_entry(&self, entry_id: &str, month_id: &str) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            EntryService::delete_entry(month, Side::Expense, entry_id)
        })
    }

    pub fn delete_income_category(&self, category_id: &str, month_id: &str) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::delete_category(month, Side::Income, category_id)
        })
    }

    pub fn delete_expense_category(
        &self,
        category_id: &str,
        month_id: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::delete_category(month, Side::Expense, category_id)
        })
    }

    pub fn add_legacy_income(
        &self,
        month_id: &str,
        category: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::add_legacy(month, Side::Income, category, amount, comment)
        })
    }

    pub fn add_legacy_expense(
        &self,
        month_id: &str,
        category: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::add_legacy(month, Side::Expense, category, amount, comment)
        })
    }

    pub fn edit_legacy_income(
        &self,
        category_id: &str,
        month_id: &str,
        category: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::edit_legacy(month, Side::Income, category_id, category, amount, comment)
        })
    }

    pub fn edit_legacy_expense(
        &self,
        category_id: &str,
        month_id: &str,
        category: &str,
        amount: f64,
        comment: &str,
    ) -> LedgerResult<Month> {
        self.mutate(month_id, |month| {
            CategoryService::edit_legacy(
                month,
                Side::Expense,
                category_id,
                category,
                amount,
                comment,
            )
        })
    }

    fn mutate<F>(&self, month_id: &str, op: F) -> LedgerResult<Month>
    where
        F: FnOnce(&mut Month) -> LedgerResult<()>,
    {
        let mut month = self.month(month_id)?;
        op(&mut month)?;
        self.months.update_month(&month)
    }
}
