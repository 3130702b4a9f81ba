//! Redaction of sensitive header values and body fields

use std::collections::BTreeMap;

use serde_json::Value;

/// Replacement written in place of a sensitive value
pub const REDACTION_MARKER: &str = "*****";

/// Header names (compared case-insensitively) whose values are masked
pub const SENSITIVE_HEADERS: [&str; 3] = ["authorization", "cookie", "x-api-key"];

/// Top-level body fields whose values are masked
pub const SENSITIVE_BODY_FIELDS: [&str; 3] = ["password", "token", "api_key"];

pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| name.eq_ignore_ascii_case(sensitive))
}

/// Copy of `headers` with sensitive values replaced
pub fn mask_headers<'a, I>(headers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .map(|(name, value)| {
            let value = if is_sensitive_header(name) {
                REDACTION_MARKER.to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

/// Copy of `body` with sensitive top-level object fields replaced
pub fn mask_body(body: &Value) -> Value {
    match body {
        Value::Object(map) => {
            let mut masked = map.clone();
            for field in SENSITIVE_BODY_FIELDS {
                if let Some(value) = masked.get_mut(field) {
                    *value = Value::String(REDACTION_MARKER.to_string());
                }
            }
            Value::Object(masked)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_headers_any_casing() {
        let mut headers = BTreeMap::new();
        headers.insert("AUTHORIZATION".to_string(), "Bearer abc".to_string());
        headers.insert("Cookie".to_string(), "session=1".to_string());
        headers.insert("x-Api-Key".to_string(), "k".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        let masked = mask_headers(&headers);
        assert_eq!(masked["AUTHORIZATION"], REDACTION_MARKER);
        assert_eq!(masked["Cookie"], REDACTION_MARKER);
        assert_eq!(masked["x-Api-Key"], REDACTION_MARKER);
        assert_eq!(masked["Accept"], "application/json");
    }

    #[test]
    fn test_mask_body_fields() {
        let body = json!({
            "username": "testuser",
            "password": "secretpass123",
            "token": "t",
            "api_key": "k",
            "nested": { "password": "left alone" }
        });

        let masked = mask_body(&body);
        assert_eq!(masked["username"], "testuser");
        assert_eq!(masked["password"], REDACTION_MARKER);
        assert_eq!(masked["token"], REDACTION_MARKER);
        assert_eq!(masked["api_key"], REDACTION_MARKER);
        assert_eq!(masked["nested"]["password"], "left alone");
    }

    #[test]
    fn test_mask_body_non_object_untouched() {
        let body = json!(["password", "token"]);
        assert_eq!(mask_body(&body), body);
    }
}
