//! JSON Schema check for model-produced function arguments.

use crate::{Error, ErrorContext, Result};
use jsonschema::{Draft, JSONSchema};

/// Compiled parameter schema; model output is untrusted until it passes.
pub struct ArgumentValidator {
    schema: JSONSchema,
}

impl ArgumentValidator {
    pub fn new(schema: &serde_json::Value) -> Result<Self> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| Error::configuration(format!("Failed to compile schema: {}", e)))?;
        Ok(Self { schema })
    }

    pub fn validate(&self, instance: &serde_json::Value) -> Result<()> {
        if let Err(errors) = self.schema.validate(instance) {
            let details: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{} at {}", e, path)
                    }
                })
                .collect();
            return Err(Error::validation_with_context(
                "function arguments do not match the declared schema",
                ErrorContext::new()
                    .with_field_path("function_call.arguments")
                    .with_details(details.join("; "))
                    .with_source("argument_validator"),
            ));
        }
        Ok(())
    }
}
