use jsonschema::JSONSchema;
use serde_json::Value;

/// Validates a JSON instance against a JSON schema
pub trait SchemaValidator: Send + Sync {
    /// `Err` carries a human-readable description of the first violation
    fn validate(&self, instance: &Value, schema: &Value) -> Result<(), String>;
}

/// `SchemaValidator` backed by the `jsonschema` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, instance: &Value, schema: &Value) -> Result<(), String> {
        let compiled =
            JSONSchema::compile(schema).map_err(|e| format!("Invalid JSON schema: {}", e))?;

        let result = compiled.validate(instance);
        if let Err(mut errors) = result {
            let message = errors
                .next()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "instance does not match schema".to_string());
            return Err(message);
        }
        Ok(())
    }
}
