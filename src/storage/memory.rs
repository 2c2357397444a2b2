//! In-memory backend used by tests and short-lived tooling.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::month::Month;
use crate::domain::recurring::RecurringTemplate;
use crate::errors::{LedgerError, LedgerResult};
use crate::insights::CachedInsight;
use crate::storage::{InsightsCacheStore, MonthStore, TemplateStore};

#[derive(Debug, Default)]
struct MemoryInner {
    months: Vec<Month>,
    templates: Vec<RecurringTemplate>,
    insights: Vec<CachedInsight>,
}

/// Shared in-memory store. Clones share the same underlying data, so one
/// `MemoryStore` can back the month, template, and insight-cache traits
/// at the same time.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Dependency("memory store mutex poisoned".into()))
    }
}

impl MonthStore for MemoryStore {
    fn find_month(&self, user_id: &str, year: i32, month: u32) -> LedgerResult<Option<Month>> {
        let inner = self.lock()?;
        Ok(inner
            .months
            .iter()
            .find(|m| m.user_id == user_id && m.year == year && m.month == month)
            .cloned())
    }

    fn find_month_by_id(&self, id: &str) -> LedgerResult<Option<Month>> {
        let inner = self.lock()?;
        Ok(inner.months.iter().find(|m| m.id == id).cloned())
    }

    fn list_months(&self, user_id: &str) -> LedgerResult<Vec<Month>> {
        let inner = self.lock()?;
        Ok(inner
            .months
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    fn insert_month(&self, month: &Month) -> LedgerResult<Month> {
        let mut inner = self.lock()?;
        if inner
            .months
            .iter()
            .any(|m| m.user_id == month.user_id && m.year == month.year && m.month == month.month)
        {
            return Err(LedgerError::Conflict("Month already exists".into()));
        }
        let mut stored = month.clone();
        stored.version = 1;
        inner.months.push(stored.clone());
        Ok(stored)
    }

    fn update_month(&self, month: &Month) -> LedgerResult<Month> {
        let mut inner = self.lock()?;
        let existing = inner
            .months
            .iter_mut()
            .find(|m| m.id == month.id)
            .ok_or_else(|| LedgerError::NotFound(format!("month {}", month.id)))?;
        if existing.version != month.version {
            return Err(LedgerError::Conflict(format!(
                "month {} was modified concurrently",
                month.id
            )));
        }
        let mut stored = month.clone();
        stored.version += 1;
        *existing = stored.clone();
        Ok(stored)
    }

    fn delete_month(&self, id: &str) -> LedgerResult<()> {
        let mut inner = self.lock()?;
        inner.months.retain(|m| m.id != id);
        Ok(())
    }
}

impl TemplateStore for MemoryStore {
    fn list_templates(&self, user_id: &str) -> LedgerResult<Vec<RecurringTemplate>> {
        let inner = self.lock()?;
        Ok(inner
            .templates
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_template(&self, id: &str) -> LedgerResult<Option<RecurringTemplate>> {
        let inner = self.lock()?;
        Ok(inner.templates.iter().find(|t| t.id == id).cloned())
    }

    fn insert_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate> {
        let mut inner = self.lock()?;
        inner.templates.push(template.clone());
        Ok(template.clone())
    }

    fn update_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate> {
        let mut inner = self.lock()?;
        let existing = inner
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| LedgerError::NotFound(format!("recurring template {}", template.id)))?;
        *existing = template.clone();
        Ok(template.clone())
    }

    fn delete_template(&self, id: &str) -> LedgerResult<()> {
        let mut inner = self.lock()?;
        inner.templates.retain(|t| t.id != id);
        Ok(())
    }
}

impl InsightsCacheStore for MemoryStore {
    fn find_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<Option<CachedInsight>> {
        let inner = self.lock()?;
        Ok(inner
            .insights
            .iter()
            .find(|c| c.user_id == user_id && c.cache_key == cache_key)
            .cloned())
    }

    fn upsert_insight(&self, record: &CachedInsight) -> LedgerResult<()> {
        let mut inner = self.lock()?;
        inner
            .insights
            .retain(|c| !(c.user_id == record.user_id && c.cache_key == record.cache_key));
        inner.insights.push(record.clone());
        Ok(())
    }

    fn delete_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<()> {
        let mut inner = self.lock()?;
        inner
            .insights
            .retain(|c| !(c.user_id == user_id && c.cache_key == cache_key));
        Ok(())
    }

    fn delete_user_insights(&self, user_id: &str) -> LedgerResult<()> {
        let mut inner = self.lock()?;
        inner.insights.retain(|c| c.user_id != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_data() {
        let store = MemoryStore::new();
        let view = store.clone();
        let month = Month::new("user-1", 2025, 3);
        store.insert_month(&month).expect("insert");
        assert!(view
            .find_month("user-1", 2025, 3)
            .expect("find")
            .is_some());
    }

    #[test]
    fn update_requires_matching_version() {
        let store = MemoryStore::new();
        let inserted = store
            .insert_month(&Month::new("user-1", 2025, 0))
            .expect("insert");

        let mut stale = inserted.clone();
        stale.version = 0;
        let err = store.update_month(&stale).expect_err("stale write");
        assert!(matches!(err, LedgerError::Conflict(_)));

        let updated = store.update_month(&inserted).expect("fresh write");
        assert_eq!(updated.version, inserted.version + 1);
    }

    #[test]
    fn delete_absent_month_is_a_noop() {
        let store = MemoryStore::new();
        store.delete_month("month-missing").expect("delete");
    }
}
