//! Pure data model: months, categories, entries, recurring templates.
//! No I/O, no storage. Only data types and their local invariants.

pub mod category;
pub mod entry;
pub mod ids;
pub mod month;
pub mod recurring;

pub use category::Category;
pub use entry::{Entry, Tag};
pub use month::{display_name, previous_month, Month};
pub use recurring::RecurringTemplate;
