use crate::domain::month::Month;

/// Restores the derived-totals invariant of a month:
/// `total_income` as the sum over income categories, `total_expense` as
/// the sum over expense categories, and `carry_forward` as their
/// difference. A negative carry-forward is a valid, meaningful state.
///
/// Pure arithmetic over the in-memory document. Cannot fail, idempotent,
/// and always the last step of a mutation before the month is persisted.
pub fn recalculate(month: &mut Month) {
    month.total_income = month.income.iter().map(|category| category.amount).sum();
    month.total_expense = month.expenses.iter().map(|category| category.amount).sum();
    month.carry_forward = month.total_income - month.total_expense;
}
