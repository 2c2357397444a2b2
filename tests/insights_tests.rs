mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use monthbook::domain::month::Month;
use monthbook::errors::LedgerResult;
use monthbook::insights::{
    InsightGenerator, InsightsService, MonthComparisons, MonthlyInsights, OverviewInsights,
};
use monthbook::storage::MemoryStore;

use common::memory_managers;

/// Counts generator invocations so cache behavior is observable.
#[derive(Default)]
struct CountingGenerator {
    overview_calls: Arc<AtomicUsize>,
    monthly_calls: Arc<AtomicUsize>,
}

impl InsightGenerator for CountingGenerator {
    fn overview_insights(
        &self,
        _user_id: &str,
        months: &[Month],
    ) -> LedgerResult<OverviewInsights> {
        self.overview_calls.fetch_add(1, Ordering::SeqCst);
        Ok(OverviewInsights {
            financial_health_score: 70,
            summary: format!("{} months on record", months.len()),
            insights: Vec::new(),
            predictions: Vec::new(),
            generated_at: Utc::now(),
        })
    }

    fn monthly_insights(
        &self,
        _user_id: &str,
        month: &Month,
        previous: Option<&Month>,
    ) -> LedgerResult<MonthlyInsights> {
        self.monthly_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MonthlyInsights {
            month_summary: month.month_name.clone(),
            insights: Vec::new(),
            comparisons: MonthComparisons {
                previous_month: previous.map(|p| p.month_name.clone()),
                changes: Vec::new(),
            },
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        })
    }
}

fn service_with_counters(
    store: MemoryStore,
) -> (InsightsService, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let generator = CountingGenerator::default();
    let overview = generator.overview_calls.clone();
    let monthly = generator.monthly_calls.clone();
    let service = InsightsService::new(Box::new(store), Box::new(generator));
    (service, overview, monthly)
}

#[test]
fn unchanged_data_is_served_from_the_cache() {
    let (manager, _, store) = memory_managers();
    manager.create_month("user-1", 2025, 0).expect("create");
    let months = manager.months_for_user("user-1").expect("list");
    let (service, overview_calls, _) = service_with_counters(store);

    let first = service
        .overview_insights("user-1", &months)
        .expect("generate");
    let second = service
        .overview_insights("user-1", &months)
        .expect("cached");
    assert_eq!(overview_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[test]
fn changed_data_invalidates_the_cache_before_expiry() {
    let (manager, _, store) = memory_managers();
    let month = manager.create_month("user-1", 2025, 0).expect("create");
    let (service, overview_calls, _) = service_with_counters(store);

    let months = manager.months_for_user("user-1").expect("list");
    service
        .overview_insights("user-1", &months)
        .expect("generate");

    manager
        .add_income_entry(&month.id, "Salary", 100.0, "")
        .expect("mutate");
    let months = manager.months_for_user("user-1").expect("list");
    service
        .overview_insights("user-1", &months)
        .expect("regenerate");
    assert_eq!(overview_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn expired_entries_regenerate_even_when_data_is_unchanged() {
    let (manager, _, store) = memory_managers();
    manager.create_month("user-1", 2025, 0).expect("create");
    let months = manager.months_for_user("user-1").expect("list");

    let generator = CountingGenerator::default();
    let calls = generator.overview_calls.clone();
    let service =
        InsightsService::with_ttl(Box::new(store), Box::new(generator), Duration::zero());

    service
        .overview_insights("user-1", &months)
        .expect("generate");
    service
        .overview_insights("user-1", &months)
        .expect("regenerate");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn regenerate_bypasses_a_fresh_cache_entry() {
    let (manager, _, store) = memory_managers();
    manager.create_month("user-1", 2025, 0).expect("create");
    let months = manager.months_for_user("user-1").expect("list");
    let (service, overview_calls, _) = service_with_counters(store);

    service
        .overview_insights("user-1", &months)
        .expect("generate");
    service
        .regenerate_overview("user-1", &months)
        .expect("forced");
    assert_eq!(overview_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn clearing_a_month_also_clears_the_overview() {
    let (manager, _, store) = memory_managers();
    let month = manager.create_month("user-1", 2025, 0).expect("create");
    let months = manager.months_for_user("user-1").expect("list");
    let (service, overview_calls, monthly_calls) = service_with_counters(store);

    service
        .overview_insights("user-1", &months)
        .expect("overview");
    service
        .monthly_insights("user-1", &month, None)
        .expect("monthly");

    service.clear_month_cache("user-1", &month.id);

    service
        .overview_insights("user-1", &months)
        .expect("overview again");
    service
        .monthly_insights("user-1", &month, None)
        .expect("monthly again");
    assert_eq!(overview_calls.load(Ordering::SeqCst), 2);
    assert_eq!(monthly_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn monthly_snapshot_covers_the_previous_month_too() {
    let (manager, _, store) = memory_managers();
    let january = manager.create_month("user-1", 2025, 0).expect("create");
    let february = manager.create_month("user-1", 2025, 1).expect("create");
    let (service, _, monthly_calls) = service_with_counters(store);

    let report = service
        .monthly_insights("user-1", &february, Some(&january))
        .expect("generate");
    assert_eq!(report.comparisons.previous_month.as_deref(), Some("January 2025"));

    manager
        .add_income_entry(&january.id, "Salary", 100.0, "")
        .expect("mutate previous");
    let january = manager.month(&january.id).expect("reload");
    service
        .monthly_insights("user-1", &february, Some(&january))
        .expect("regenerate");
    assert_eq!(monthly_calls.load(Ordering::SeqCst), 2);
}
