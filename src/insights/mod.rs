//! Narrative insight generation over finalized month snapshots, behind a
//! snapshot-hashed, time-boxed cache.
//!
//! The text generation itself is an external collaborator hidden behind
//! [`InsightGenerator`]; this module owns only the caching contract: a
//! cached result is served while it is unexpired AND the SHA-256 snapshot
//! of the input data still matches.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::domain::month::Month;
use crate::errors::{LedgerError, LedgerResult};
use crate::storage::InsightsCacheStore;

/// Cached results are kept for one day unless the underlying data changes
/// first.
pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Overview,
    Monthly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Spending,
    Budget,
    Savings,
    Prediction,
    Health,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Warning,
    Success,
    Critical,
}

/// One titled finding inside a generated report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<InsightSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable: Option<bool>,
}

/// Cross-month report generated from a user's full history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverviewInsights {
    pub financial_health_score: u8,
    pub summary: String,
    pub insights: Vec<InsightItem>,
    pub predictions: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChange {
    pub category: String,
    pub change: f64,
    pub direction: ChangeDirection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparisons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_month: Option<String>,
    #[serde(default)]
    pub changes: Vec<CategoryChange>,
}

/// Single-month report, optionally contrasted with the preceding month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInsights {
    pub month_summary: String,
    pub insights: Vec<InsightItem>,
    #[serde(default)]
    pub comparisons: MonthComparisons,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// External text-generation collaborator. Implementations receive a data
/// snapshot and return structured insight text; they never see the cache.
pub trait InsightGenerator: Send + Sync {
    fn overview_insights(&self, user_id: &str, months: &[Month])
        -> LedgerResult<OverviewInsights>;
    fn monthly_insights(
        &self,
        user_id: &str,
        month: &Month,
        previous: Option<&Month>,
    ) -> LedgerResult<MonthlyInsights>;
}

/// One persisted cache row, unique per `(user_id, cache_key)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedInsight {
    pub user_id: String,
    pub cache_key: String,
    pub kind: InsightKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_id: Option<String>,
    pub payload: serde_json::Value,
    pub data_snapshot: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Serves insight reports, generating through the collaborator only when
/// no fresh cached result matches the current data snapshot.
pub struct InsightsService {
    cache: Box<dyn InsightsCacheStore>,
    generator: Box<dyn InsightGenerator>,
    ttl: Duration,
}

impl InsightsService {
    pub fn new(cache: Box<dyn InsightsCacheStore>, generator: Box<dyn InsightGenerator>) -> Self {
        Self::with_ttl(cache, generator, Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_ttl(
        cache: Box<dyn InsightsCacheStore>,
        generator: Box<dyn InsightGenerator>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            generator,
            ttl,
        }
    }

    pub fn overview_cache_key(user_id: &str) -> String {
        format!("overview-{user_id}")
    }

    pub fn monthly_cache_key(user_id: &str, month_id: &str) -> String {
        format!("monthly-{user_id}-{month_id}")
    }

    pub fn overview_insights(
        &self,
        user_id: &str,
        months: &[Month],
    ) -> LedgerResult<OverviewInsights> {
        let cache_key = Self::overview_cache_key(user_id);
        let snapshot = data_snapshot(&months)?;
        if let Some(cached) = self.fresh_cached(user_id, &cache_key, &snapshot)? {
            debug!(user_id, "overview insights cache hit");
            return serde_json::from_value(cached.payload).map_err(LedgerError::from);
        }

        info!(user_id, "overview insights cache miss, generating");
        let insights = self.generator.overview_insights(user_id, months)?;
        self.store(CachedInsight {
            user_id: user_id.to_string(),
            cache_key,
            kind: InsightKind::Overview,
            month_id: None,
            payload: serde_json::to_value(&insights)?,
            data_snapshot: snapshot,
            generated_at: Utc::now(),
            expires_at: Utc::now() + self.ttl,
        })?;
        Ok(insights)
    }

    pub fn monthly_insights(
        &self,
        user_id: &str,
        month: &Month,
        previous: Option<&Month>,
    ) -> LedgerResult<MonthlyInsights> {
        let cache_key = Self::monthly_cache_key(user_id, &month.id);
        let snapshot = data_snapshot(&(month, previous))?;
        if let Some(cached) = self.fresh_cached(user_id, &cache_key, &snapshot)? {
            debug!(user_id, month_id = %month.id, "monthly insights cache hit");
            return serde_json::from_value(cached.payload).map_err(LedgerError::from);
        }

        info!(user_id, month_id = %month.id, "monthly insights cache miss, generating");
        let insights = self.generator.monthly_insights(user_id, month, previous)?;
        self.store(CachedInsight {
            user_id: user_id.to_string(),
            cache_key,
            kind: InsightKind::Monthly,
            month_id: Some(month.id.clone()),
            payload: serde_json::to_value(&insights)?,
            data_snapshot: snapshot,
            generated_at: Utc::now(),
            expires_at: Utc::now() + self.ttl,
        })?;
        Ok(insights)
    }

    /// Drops every cached report for the user. Failures are logged and
    /// swallowed; a broken cache must not break the caller.
    pub fn clear_user_cache(&self, user_id: &str) {
        if let Err(err) = self.cache.delete_user_insights(user_id) {
            warn!(user_id, %err, "failed to clear user insight cache");
        }
    }

    /// Drops the cached report for one month, plus the overview report
    /// (month data feeds into it). Failures are logged and swallowed.
    pub fn clear_month_cache(&self, user_id: &str, month_id: &str) {
        let monthly_key = Self::monthly_cache_key(user_id, month_id);
        if let Err(err) = self.cache.delete_insight(user_id, &monthly_key) {
            warn!(user_id, month_id, %err, "failed to clear monthly insight cache");
        }
        let overview_key = Self::overview_cache_key(user_id);
        if let Err(err) = self.cache.delete_insight(user_id, &overview_key) {
            warn!(user_id, %err, "failed to clear overview insight cache");
        }
    }

    /// Discards any cached overview and generates a fresh one.
    pub fn regenerate_overview(
        &self,
        user_id: &str,
        months: &[Month],
    ) -> LedgerResult<OverviewInsights> {
        self.cache
            .delete_insight(user_id, &Self::overview_cache_key(user_id))?;
        self.overview_insights(user_id, months)
    }

    /// Discards any cached report for the month and generates a fresh one.
    pub fn regenerate_monthly(
        &self,
        user_id: &str,
        month: &Month,
        previous: Option<&Month>,
    ) -> LedgerResult<MonthlyInsights> {
        self.cache
            .delete_insight(user_id, &Self::monthly_cache_key(user_id, &month.id))?;
        self.monthly_insights(user_id, month, previous)
    }

    fn fresh_cached(
        &self,
        user_id: &str,
        cache_key: &str,
        snapshot: &str,
    ) -> LedgerResult<Option<CachedInsight>> {
        Ok(self
            .cache
            .find_insight(user_id, cache_key)?
            .filter(|cached| cached.expires_at > Utc::now() && cached.data_snapshot == snapshot))
    }

    fn store(&self, record: CachedInsight) -> LedgerResult<()> {
        self.cache.upsert_insight(&record)
    }
}

/// SHA-256 of the canonical JSON serialization, used to detect stale
/// cached reports after the underlying ledger data changes.
fn data_snapshot<T: Serialize>(data: &T) -> LedgerResult<String> {
    let bytes = serde_json::to_vec(data)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_follow_the_documented_format() {
        assert_eq!(
            InsightsService::overview_cache_key("user-1"),
            "overview-user-1"
        );
        assert_eq!(
            InsightsService::monthly_cache_key("user-1", "month-abc"),
            "monthly-user-1-month-abc"
        );
    }

    #[test]
    fn snapshots_differ_when_data_differs() {
        let a = data_snapshot(&vec![1, 2, 3]).expect("snapshot");
        let b = data_snapshot(&vec![1, 2, 4]).expect("snapshot");
        assert_ne!(a, b);
        assert_eq!(a, data_snapshot(&vec![1, 2, 3]).expect("snapshot"));
    }
}
