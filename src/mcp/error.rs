use serde_json::Value;
use thiserror::Error;

/// A single schema violation detected while validating tool arguments.
///
/// Messages name the offending field and the violated constraint; the
/// received value is quoted to make host-side debugging possible.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unexpected field(s): {}", .fields.join(", "))]
    UnexpectedFields { fields: Vec<String> },
    #[error("missing required field '{field}'")]
    MissingField { field: String },
    #[error("field '{field}' must be {expected}, got {value}")]
    InvalidType {
        field: String,
        expected: &'static str,
        value: Value,
    },
    #[error("field '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: Value,
    },
    #[error("field '{}' must be one of [{}], got {}", .field, .allowed.join(", "), .value)]
    NotInEnum {
        field: String,
        allowed: Vec<String>,
        value: Value,
    },
}

/// Every way a tool call can fail. All variants are terminal at the
/// dispatcher: they become failure envelopes, never panics or transport
/// errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Input validation error: {0}")]
    Validation(#[from] ValidationError),
    /// The provider answered, but with its own error flag set or a
    /// payload we cannot use.
    #[error("{0}")]
    Upstream(String),
    /// The provider could not be reached or returned a non-2xx status.
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Error processing request: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_tool_message_quotes_name() {
        let err = ToolError::UnknownTool("frobnicate".to_string());
        assert_eq!(err.to_string(), "Unknown tool: frobnicate");
    }

    #[test]
    fn test_validation_error_names_field_and_value() {
        let err = ToolError::Validation(ValidationError::OutOfRange {
            field: "urgency".to_string(),
            min: 1.0,
            max: 5.0,
            value: json!(9),
        });
        let message = err.to_string();
        assert!(message.starts_with("Input validation error:"));
        assert!(message.contains("urgency"));
        assert!(message.contains('9'));
    }

    #[test]
    fn test_unexpected_fields_are_enumerated() {
        let err = ValidationError::UnexpectedFields {
            fields: vec!["foo".to_string(), "bar".to_string()],
        };
        assert_eq!(err.to_string(), "unexpected field(s): foo, bar");
    }
}
