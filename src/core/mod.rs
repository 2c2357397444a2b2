//! Business logic: per-month mutation services, the month lifecycle
//! facade, and recurring-template management.

pub mod month_manager;
pub mod recurring;
pub mod services;

pub use month_manager::MonthManager;
pub use recurring::RecurringService;
pub use services::{CategoryService, EntryService, Side};
