//! Response validation and the API test runner
//!
//! - `checks` - Status, schema, header and content checks
//! - `schema` - The `SchemaValidator` seam and its jsonschema implementation
//! - `api_test` - `ApiTest`, which runs a request and records its outcome

pub mod checks;
pub mod schema;

pub use api_test::ApiTest;
pub use checks::{validate_headers, validate_json_content, validate_json_schema, validate_status_code};
pub use schema::{JsonSchemaValidator, SchemaValidator};

/// Why an API test did not pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    /// One message per failed check, in check order
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// Request dispatch or preparation failed
    #[error("{0}")]
    Execution(String),
}

impl TestError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TestError::Validation(_))
    }

    /// Validation messages, empty for execution faults
    pub fn failures(&self) -> &[String] {
        match self {
            TestError::Validation(failures) => failures,
            TestError::Execution(_) => &[],
        }
    }
}
