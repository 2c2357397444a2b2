//! Abstractions over persistence backends plus the bundled in-memory and
//! JSON-file implementations.

pub mod json_backend;
pub mod memory;

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

use crate::domain::month::Month;
use crate::domain::recurring::RecurringTemplate;
use crate::errors::LedgerResult;
use crate::insights::CachedInsight;

/// Store of month documents keyed by `(user_id, year, month)`.
///
/// A month is the unit of mutation: writers read the whole document,
/// mutate it in memory, and hand it back. `update_month` performs a
/// compare-and-swap on the document version so two concurrent writers
/// cannot silently double-apply; the loser gets `Conflict` and retries
/// from a fresh read.
pub trait MonthStore: Send + Sync {
    fn find_month(&self, user_id: &str, year: i32, month: u32) -> LedgerResult<Option<Month>>;
    fn find_month_by_id(&self, id: &str) -> LedgerResult<Option<Month>>;
    fn list_months(&self, user_id: &str) -> LedgerResult<Vec<Month>>;
    /// Persists a new month; `Conflict` when the `(user, year, month)`
    /// triple already exists. Returns the stored document.
    fn insert_month(&self, month: &Month) -> LedgerResult<Month>;
    /// Persists a mutation; `NotFound` for unknown ids, `Conflict` when the
    /// stored version differs from `month.version`. Returns the stored
    /// document with its bumped version.
    fn update_month(&self, month: &Month) -> LedgerResult<Month>;
    /// Removes a month document; removing an absent id is a no-op.
    fn delete_month(&self, id: &str) -> LedgerResult<()>;
}

/// Store of per-user recurring expense templates.
pub trait TemplateStore: Send + Sync {
    fn list_templates(&self, user_id: &str) -> LedgerResult<Vec<RecurringTemplate>>;
    fn find_template(&self, id: &str) -> LedgerResult<Option<RecurringTemplate>>;
    fn insert_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate>;
    fn update_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate>;
    /// Removes a template; removing an absent id is a no-op.
    fn delete_template(&self, id: &str) -> LedgerResult<()>;
}

/// Store of cached insight generations, unique per `(user_id, cache_key)`.
pub trait InsightsCacheStore: Send + Sync {
    fn find_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<Option<CachedInsight>>;
    fn upsert_insight(&self, record: &CachedInsight) -> LedgerResult<()>;
    fn delete_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<()>;
    fn delete_user_insights(&self, user_id: &str) -> LedgerResult<()>;
}
