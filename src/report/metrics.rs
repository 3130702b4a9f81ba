//! Metrics aggregation over test outcomes
//!
//! `MetricsAggregator` keeps raw running totals behind a mutex. Derived
//! values (success rate, per-endpoint averages) are only computed when a
//! `MetricsSnapshot` is taken, so readers never see a half-applied update.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::outcome::{TestOutcome, TestStatus};

/// Raw running totals
#[derive(Debug, Clone, Default, PartialEq)]
struct Totals {
    total: u64,
    passed: u64,
    failed: u64,
    errors: u64,
    execution_time: f64,
    /// "METHOD endpoint" -> durations in completion order
    response_times: BTreeMap<String, Vec<f64>>,
    status_codes: BTreeMap<u16, u64>,
}

/// Point-in-time view of the aggregated metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_tests: u64,
    pub passed_tests: u64,
    pub failed_tests: u64,
    pub error_tests: u64,
    /// Percentage of passed tests, 0 when nothing has run
    pub success_rate: f64,
    pub total_execution_time: f64,
    pub average_response_times: BTreeMap<String, f64>,
    pub status_code_distribution: BTreeMap<u16, u64>,
}

/// Thread-safe running aggregation of `TestOutcome`s
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    totals: Mutex<Totals>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Totals> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fold one outcome into the running totals
    pub fn ingest(&self, outcome: &TestOutcome) {
        let mut totals = self.lock();

        totals.total += 1;
        match outcome.status {
            TestStatus::Success => totals.passed += 1,
            TestStatus::Failed => totals.failed += 1,
            TestStatus::Error => totals.errors += 1,
        }
        totals.execution_time += outcome.execution_time;

        totals
            .response_times
            .entry(outcome.endpoint_key())
            .or_default()
            .push(outcome.execution_time);

        if let Some(code) = outcome.response_code {
            *totals.status_codes.entry(code).or_insert(0) += 1;
        }
    }

    /// Consistent copy of the current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let totals = self.lock();

        let success_rate = if totals.total == 0 {
            0.0
        } else {
            totals.passed as f64 / totals.total as f64 * 100.0
        };

        let average_response_times = totals
            .response_times
            .iter()
            .map(|(key, times)| {
                let mean = times.iter().sum::<f64>() / times.len() as f64;
                (key.clone(), mean)
            })
            .collect();

        MetricsSnapshot {
            total_tests: totals.total,
            passed_tests: totals.passed,
            failed_tests: totals.failed,
            error_tests: totals.errors,
            success_rate,
            total_execution_time: totals.execution_time,
            average_response_times,
            status_code_distribution: totals.status_codes.clone(),
        }
    }

    /// Durations recorded for one "METHOD endpoint" key, in completion order
    pub fn response_times(&self, key: &str) -> Vec<f64> {
        self.lock()
            .response_times
            .get(key)
            .cloned()
            .unwrap_or_default()
    }
}
