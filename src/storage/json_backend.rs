//! JSON-file backend: one file per month document, one file per user for
//! templates and for cached insights.
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so
//! a crash mid-write leaves the previous file intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::month::Month;
use crate::domain::recurring::RecurringTemplate;
use crate::errors::{LedgerError, LedgerResult};
use crate::insights::CachedInsight;
use crate::storage::{InsightsCacheStore, MonthStore, TemplateStore};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store rooted at a base directory:
///
/// ```text
/// <base>/months/<month-id>.json      one document each
/// <base>/templates/<user>.json       all templates of one user
/// <base>/insights/<user>.json        all cached insights of one user
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    months_dir: PathBuf,
    templates_dir: PathBuf,
    insights_dir: PathBuf,
}

impl JsonStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> LedgerResult<Self> {
        let base = base_dir.into();
        let store = Self {
            months_dir: base.join("months"),
            templates_dir: base.join("templates"),
            insights_dir: base.join("insights"),
        };
        ensure_dir(&store.months_dir)?;
        ensure_dir(&store.templates_dir)?;
        ensure_dir(&store.insights_dir)?;
        Ok(store)
    }

    fn month_path(&self, id: &str) -> PathBuf {
        self.months_dir.join(format!("{}.json", file_stem(id)))
    }

    fn templates_path(&self, user_id: &str) -> PathBuf {
        self.templates_dir
            .join(format!("{}.json", file_stem(user_id)))
    }

    fn insights_path(&self, user_id: &str) -> PathBuf {
        self.insights_dir
            .join(format!("{}.json", file_stem(user_id)))
    }

    fn read_month(&self, path: &Path) -> LedgerResult<Option<Month>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Scans every month file. Key lookups other than by id go through
    /// here; the corpus per user is small enough that a scan is fine.
    fn all_months(&self) -> LedgerResult<Vec<Month>> {
        let mut months = Vec::new();
        for entry in fs::read_dir(&self.months_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(month) = self.read_month(&path)? {
                months.push(month);
            }
        }
        Ok(months)
    }

    fn write_month(&self, month: &Month) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(month)?;
        write_atomic(&self.month_path(&month.id), &json)
    }

    fn read_templates(&self, user_id: &str) -> LedgerResult<Vec<RecurringTemplate>> {
        let path = self.templates_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_templates(
        &self,
        user_id: &str,
        templates: &[RecurringTemplate],
    ) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(templates)?;
        write_atomic(&self.templates_path(user_id), &json)
    }

    /// Template ids are unique but files are keyed by user, so id lookups
    /// scan every user file.
    fn all_templates(&self) -> LedgerResult<Vec<RecurringTemplate>> {
        let mut templates = Vec::new();
        for entry in fs::read_dir(&self.templates_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read_to_string(&path)?;
            let mut batch: Vec<RecurringTemplate> = serde_json::from_str(&data)?;
            templates.append(&mut batch);
        }
        Ok(templates)
    }

    fn read_insights(&self, user_id: &str) -> LedgerResult<Vec<CachedInsight>> {
        let path = self.insights_path(user_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_insights(&self, user_id: &str, records: &[CachedInsight]) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        write_atomic(&self.insights_path(user_id), &json)
    }
}

impl MonthStore for JsonStore {
    fn find_month(&self, user_id: &str, year: i32, month: u32) -> LedgerResult<Option<Month>> {
        Ok(self
            .all_months()?
            .into_iter()
            .find(|m| m.user_id == user_id && m.year == year && m.month == month))
    }

    fn find_month_by_id(&self, id: &str) -> LedgerResult<Option<Month>> {
        self.read_month(&self.month_path(id))
    }

    fn list_months(&self, user_id: &str) -> LedgerResult<Vec<Month>> {
        Ok(self
            .all_months()?
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect())
    }

    fn insert_month(&self, month: &Month) -> LedgerResult<Month> {
        if self
            .find_month(&month.user_id, month.year, month.month)?
            .is_some()
        {
            return Err(LedgerError::Conflict("Month already exists".into()));
        }
        let mut stored = month.clone();
        stored.version = 1;
        self.write_month(&stored)?;
        Ok(stored)
    }

    fn update_month(&self, month: &Month) -> LedgerResult<Month> {
        let existing = self
            .find_month_by_id(&month.id)?
            .ok_or_else(|| LedgerError::NotFound(format!("month {}", month.id)))?;
        if existing.version != month.version {
            return Err(LedgerError::Conflict(format!(
                "month {} was modified concurrently",
                month.id
            )));
        }
        let mut stored = month.clone();
        stored.version += 1;
        self.write_month(&stored)?;
        Ok(stored)
    }

    fn delete_month(&self, id: &str) -> LedgerResult<()> {
        let path = self.month_path(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl TemplateStore for JsonStore {
    fn list_templates(&self, user_id: &str) -> LedgerResult<Vec<RecurringTemplate>> {
        self.read_templates(user_id)
    }

    fn find_template(&self, id: &str) -> LedgerResult<Option<RecurringTemplate>> {
        Ok(self.all_templates()?.into_iter().find(|t| t.id == id))
    }

    fn insert_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate> {
        let mut templates = self.read_templates(&template.user_id)?;
        templates.push(template.clone());
        self.write_templates(&template.user_id, &templates)?;
        Ok(template.clone())
    }

    fn update_template(&self, template: &RecurringTemplate) -> LedgerResult<RecurringTemplate> {
        let mut templates = self.read_templates(&template.user_id)?;
        let existing = templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| LedgerError::NotFound(format!("recurring template {}", template.id)))?;
        *existing = template.clone();
        self.write_templates(&template.user_id, &templates)?;
        Ok(template.clone())
    }

    fn delete_template(&self, id: &str) -> LedgerResult<()> {
        let Some(template) = self.find_template(id)? else {
            return Ok(());
        };
        let mut templates = self.read_templates(&template.user_id)?;
        templates.retain(|t| t.id != id);
        self.write_templates(&template.user_id, &templates)
    }
}

impl InsightsCacheStore for JsonStore {
    fn find_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<Option<CachedInsight>> {
        Ok(self
            .read_insights(user_id)?
            .into_iter()
            .find(|c| c.cache_key == cache_key))
    }

    fn upsert_insight(&self, record: &CachedInsight) -> LedgerResult<()> {
        let mut records = self.read_insights(&record.user_id)?;
        records.retain(|c| c.cache_key != record.cache_key);
        records.push(record.clone());
        self.write_insights(&record.user_id, &records)
    }

    fn delete_insight(&self, user_id: &str, cache_key: &str) -> LedgerResult<()> {
        let mut records = self.read_insights(user_id)?;
        records.retain(|c| c.cache_key != cache_key);
        self.write_insights(user_id, &records)
    }

    fn delete_user_insights(&self, user_id: &str) -> LedgerResult<()> {
        let path = self.insights_path(user_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> LedgerResult<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Restricts file stems to a safe alphabet so a hostile id cannot escape
/// the store directory.
fn file_stem(raw: &str) -> String {
    let sanitized: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "record".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> LedgerResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::new(temp.path()).expect("json store");
        (store, temp)
    }

    #[test]
    fn month_files_survive_reopen() {
        let temp = TempDir::new().expect("temp dir");
        let stored = {
            let store = JsonStore::new(temp.path()).expect("json store");
            store
                .insert_month(&Month::new("user-1", 2025, 4))
                .expect("insert")
        };
        let reopened = JsonStore::new(temp.path()).expect("json store");
        let found = reopened
            .find_month_by_id(&stored.id)
            .expect("find")
            .expect("month present");
        assert_eq!(found, stored);
    }

    #[test]
    fn hostile_ids_stay_inside_the_store() {
        let (store, guard) = store_with_temp_dir();
        let path = store.month_path("../../etc/passwd");
        assert!(path.starts_with(guard.path()));
    }

    #[test]
    fn templates_are_partitioned_by_user() {
        let (store, _guard) = store_with_temp_dir();
        let mine = RecurringTemplate::new("user-1", "Rent", 1200.0, "flat", Default::default());
        let theirs = RecurringTemplate::new("user-2", "Gym", 40.0, "", Default::default());
        store.insert_template(&mine).expect("insert");
        store.insert_template(&theirs).expect("insert");

        let listed = store.list_templates("user-1").expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "Rent");
    }
}
