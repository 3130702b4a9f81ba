//! Response checks
//!
//! Each check returns `Err(message)` instead of panicking so callers can run
//! every configured check and report all failures together.

use std::collections::BTreeMap;

use serde_json::Value;

use super::schema::SchemaValidator;
use crate::client::HttpResponse;

pub fn validate_status_code(response: &HttpResponse, expected: u16) -> Result<(), String> {
    if response.status == expected {
        Ok(())
    } else {
        Err(format!(
            "Expected status code {}, got {}",
            expected, response.status
        ))
    }
}

pub fn validate_json_schema(
    response: &HttpResponse,
    schema: &Value,
    validator: &dyn SchemaValidator,
) -> Result<(), String> {
    let body = response
        .json()
        .map_err(|_| "Response is not valid JSON".to_string())?;

    validator
        .validate(&body, schema)
        .map_err(|message| format!("JSON schema validation failed: {}", message))
}

/// Stops at the first missing or mismatched header
pub fn validate_headers(
    response: &HttpResponse,
    expected: &BTreeMap<String, String>,
) -> Result<(), String> {
    for (name, value) in expected {
        let actual = response
            .header(name)
            .ok_or_else(|| format!("Header '{}' not found in response", name))?;
        if actual != value.as_str() {
            return Err(format!(
                "Expected header '{}' to be '{}', got '{}'",
                name, value, actual
            ));
        }
    }
    Ok(())
}

pub fn validate_json_content(response: &HttpResponse, expected: &Value) -> Result<(), String> {
    let body = response
        .json()
        .map_err(|_| "Response is not valid JSON".to_string())?;

    if &body == expected {
        Ok(())
    } else {
        Err(format!("Expected content {}, got {}", expected, body))
    }
}
