//! Parameter validation against a tool's JSON schema (§4.5).

use forge_protocol::ToolDescriptor;
use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::MalformedArgumentsSnafu;
use crate::error::Result;
use crate::error::ValidationFailedSnafu;
use crate::repair::parse_tolerant;

/// Parse raw argument text (tolerating the repairable malformations in
/// [`crate::repair`]) and validate it against `descriptor`'s schema.
///
/// Returns `Err(ToolError::ValidationFailed)` with the schema error
/// text so the model can learn the correct shape next turn, or
/// `Err(ToolError::MalformedArguments)` if the text isn't JSON even
/// after repair.
pub fn parse_and_validate(descriptor: &ToolDescriptor, raw_arguments: &str) -> Result<Value> {
    let value = parse_tolerant(raw_arguments)
        .map_err(|source| MalformedArgumentsSnafu { name: descriptor.name.clone(), message: source.to_string() }.build())?;
    validate_value(descriptor, value)
}

/// Validate an already-parsed argument value (e.g. one the provider
/// delivered as structured JSON rather than a raw string) against
/// `descriptor`'s schema.
pub fn validate_value(descriptor: &ToolDescriptor, value: Value) -> Result<Value> {
    let compiled = JSONSchema::compile(&descriptor.parameters_schema).map_err(|source| {
        ValidationFailedSnafu { name: descriptor.name.clone(), message: format!("invalid schema: {source}") }.build()
    })?;

    if let Err(errors) = compiled.validate(&value) {
        let message = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        return ValidationFailedSnafu { name: descriptor.name.clone(), message }.fail();
    }
    Ok(value)
}

#[cfg(test)]
#[path = "validate.test.rs"]
mod tests;
