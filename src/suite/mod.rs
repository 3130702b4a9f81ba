//! Declarative test suites
//!
//! A suite is a YAML file listing API test cases:
//!
//! ```yaml
//! name: users
//! group: UserApi
//! cases:
//!   - name: test_create_user
//!     method: POST
//!     endpoint: /users
//!     request:
//!       json:
//!         username: testuser
//!     expect:
//!       status: 201
//!       schema:
//!         type: object
//!         required: [id, username]
//!       headers:
//!         Content-Type: application/json
//! ```

pub mod loader;
pub mod runner;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Method, RequestOptions};
use crate::validation::ApiTest;

pub use loader::{LoadError, SuiteLoader};
pub use runner::{CaseResult, SuiteRunner, SuiteSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    pub name: String,
    /// Reported as the test class; defaults to the suite name
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub request: RequestOptions,
    #[serde(default)]
    pub expect: Expectations,
}

impl TestCase {
    pub fn to_api_test(&self, group: &str) -> ApiTest {
        let mut test = ApiTest::new(&self.name, group, &self.endpoint)
            .method(self.method)
            .expect_status(self.expect.status);

        if let Some(schema) = &self.expect.schema {
            test = test.expect_schema(schema.clone());
        }
        if let Some(headers) = &self.expect.headers {
            test = test.expect_headers(headers.clone());
        }
        if let Some(content) = &self.expect.content {
            test = test.expect_content(content.clone());
        }
        test
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub content: Option<Value>,
}

fn default_status() -> u16 {
    200
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            status: default_status(),
            schema: None,
            headers: None,
            content: None,
        }
    }
}
