//! Alert and status aggregation

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use uuid::Uuid;

use crate::domain::alert::{Alert, AlertLevel};
use crate::domain::run::Run;
use crate::domain::test_outcome::TestOutcomeItem;
use crate::dto::summary::SummaryItem;

/// Alerts of one level with their cumulative count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertGroup {
    pub count: u64,
    pub alerts: Vec<Alert>,
}

impl AlertGroup {
    fn push(&mut self, alert: &Alert) {
        self.count += alert.count;
        self.alerts.push(alert.clone());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertAggregate {
    pub errors: AlertGroup,
    pub warnings: AlertGroup,
}

impl AlertAggregate {
    pub fn total(&self) -> u64 {
        self.errors.count + self.warnings.count
    }
}

/// Partition alerts by level, summing each alert's own multiplicity
pub fn aggregate_alerts<'a, I>(alerts: I) -> AlertAggregate
where
    I: IntoIterator<Item = &'a Alert>,
{
    alerts
        .into_iter()
        .fold(AlertAggregate::default(), |mut aggregate, alert| {
            match alert.level {
                AlertLevel::Error => aggregate.errors.push(alert),
                AlertLevel::Warning => aggregate.warnings.push(alert),
            }
            aggregate
        })
}

/// Group runs by their pipeline
///
/// Order within a group is insertion order; order across groups is undefined.
pub fn runs_by_component(runs: &[Run]) -> HashMap<Uuid, Vec<Run>> {
    group_by(runs, |run| run.pipeline.id)
}

/// Group test outcomes by the component they tested
pub fn tests_by_component(tests: &[TestOutcomeItem]) -> HashMap<Uuid, Vec<TestOutcomeItem>> {
    group_by(tests, |test| test.component.id)
}

fn group_by<T: Clone>(items: &[T], key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item.clone());
    }
    groups
}

/// Cumulative count per status plus a grand total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteSummary<S: Ord> {
    #[serde(flatten)]
    pub counts: BTreeMap<S, u64>,
    #[serde(rename = "TOTAL")]
    pub total: u64,
}

impl<S: Ord> CompleteSummary<S> {
    /// Count for one status, zero when absent
    pub fn get(&self, status: &S) -> u64 {
        self.counts.get(status).copied().unwrap_or(0)
    }
}

impl<S: Ord> Default for CompleteSummary<S> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

/// Fold `{status, count}` rows into per-status totals
pub fn get_complete_summary<'a, S, I>(items: I) -> CompleteSummary<S>
where
    S: Ord + Copy + 'a,
    I: IntoIterator<Item = &'a SummaryItem<S>>,
{
    items
        .into_iter()
        .fold(CompleteSummary::default(), |mut summary, item| {
            *summary.counts.entry(item.status).or_insert(0) += item.count;
            summary.total += item.count;
            summary
        })
}
