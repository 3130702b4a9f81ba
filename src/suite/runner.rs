use tracing::{info, warn};

use super::TestSuite;
use crate::client::ApiClient;
use crate::report::{ReportStore, TestStatus};
use crate::validation::TestError;

/// Result of one case in a suite run
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub name: String,
    pub status: TestStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteSummary {
    pub suite: String,
    pub cases: Vec<CaseResult>,
    /// Cases not run because an earlier case failed with fail-fast enabled
    pub skipped: Vec<String>,
}

impl SuiteSummary {
    fn count(&self, status: TestStatus) -> usize {
        self.cases.iter().filter(|c| c.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(TestStatus::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    pub fn errored(&self) -> usize {
        self.count(TestStatus::Error)
    }

    pub fn success(&self) -> bool {
        self.passed() == self.cases.len() && self.skipped.is_empty()
    }
}

/// Runs suite cases one after another against a shared client and store
pub struct SuiteRunner<'a> {
    client: &'a ApiClient,
    store: &'a ReportStore,
    fail_fast: bool,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(client: &'a ApiClient, store: &'a ReportStore) -> Self {
        Self {
            client,
            store,
            fail_fast: false,
        }
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub async fn run(&self, suite: &TestSuite) -> SuiteSummary {
        let mut summary = SuiteSummary {
            suite: suite.name.clone(),
            ..SuiteSummary::default()
        };
        info!(suite = %suite.name, cases = suite.cases.len(), "Running suite");

        for (index, case) in suite.cases.iter().enumerate() {
            let test = case.to_api_test(suite.group());
            let result = test.run(self.client, self.store, case.request.clone()).await;

            let (status, message) = match result {
                Ok(_) => (TestStatus::Success, None),
                Err(e @ TestError::Validation(_)) => (TestStatus::Failed, Some(e.to_string())),
                Err(e @ TestError::Execution(_)) => (TestStatus::Error, Some(e.to_string())),
            };
            let stop = self.fail_fast && status != TestStatus::Success;

            summary.cases.push(CaseResult {
                name: case.name.clone(),
                status,
                message,
            });

            if stop {
                summary.skipped = suite.cases[index + 1..]
                    .iter()
                    .map(|c| c.name.clone())
                    .collect();
                warn!(
                    suite = %suite.name,
                    case = %case.name,
                    skipped = summary.skipped.len(),
                    "Stopping suite after first failure"
                );
                break;
            }
        }

        info!(
            suite = %suite.name,
            passed = summary.passed(),
            failed = summary.failed(),
            errors = summary.errored(),
            "Suite finished"
        );
        summary
    }
}
