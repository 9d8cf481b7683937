//! Declarative input schemas for tool arguments.
//!
//! Schemas are a closed set of field constraints rather than free-form
//! JSON Schema documents, so validation can be checked exhaustively.
//! `to_json()` renders the JSON-Schema-shaped object advertised through
//! `tools/list`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::error::{ToolError, ValidationError};

#[derive(Debug, Clone)]
pub enum FieldKind {
    String { enum_values: Option<Vec<String>> },
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64>, max: Option<i64> },
    Boolean,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    kind: FieldKind,
    description: String,
    required: bool,
    default: Option<Value>,
}

impl FieldSpec {
    fn new(kind: FieldKind, description: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            required: false,
            default: None,
        }
    }

    pub fn string(description: &str) -> Self {
        Self::new(FieldKind::String { enum_values: None }, description)
    }

    pub fn one_of(description: &str, values: &[&str]) -> Self {
        Self::new(
            FieldKind::String {
                enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            },
            description,
        )
    }

    pub fn number(description: &str) -> Self {
        Self::new(
            FieldKind::Number {
                min: None,
                max: None,
            },
            description,
        )
    }

    pub fn integer(description: &str) -> Self {
        Self::new(
            FieldKind::Integer {
                min: None,
                max: None,
            },
            description,
        )
    }

    pub fn boolean(description: &str) -> Self {
        Self::new(FieldKind::Boolean, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Lower bound only, for numeric fields. No effect on other kinds.
    pub fn at_least(mut self, lo: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer { min, .. } => *min = Some(lo),
            FieldKind::Number { min, .. } => *min = Some(lo as f64),
            _ => {}
        }
        self
    }

    /// Closed bounds for numeric fields. No effect on other kinds.
    pub fn bounds(mut self, lo: i64, hi: i64) -> Self {
        match &mut self.kind {
            FieldKind::Integer { min, max } => {
                *min = Some(lo);
                *max = Some(hi);
            }
            FieldKind::Number { min, max } => {
                *min = Some(lo as f64);
                *max = Some(hi as f64);
            }
            _ => {}
        }
        self
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            FieldKind::String { .. } => "string",
            FieldKind::Number { .. } => "number",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Boolean => "boolean",
        }
    }

    fn check(&self, name: &str, value: &Value) -> Result<(), ValidationError> {
        let invalid_type = |expected: &'static str| ValidationError::InvalidType {
            field: name.to_string(),
            expected,
            value: value.clone(),
        };

        match &self.kind {
            FieldKind::String { enum_values } => {
                let text = value.as_str().ok_or_else(|| invalid_type("a string"))?;
                if let Some(allowed) = enum_values
                    && !allowed.iter().any(|a| a == text)
                {
                    return Err(ValidationError::NotInEnum {
                        field: name.to_string(),
                        allowed: allowed.clone(),
                        value: value.clone(),
                    });
                }
            }
            FieldKind::Number { min, max } => {
                let number = value.as_f64().ok_or_else(|| invalid_type("a number"))?;
                if min.is_some_and(|lo| number < lo) || max.is_some_and(|hi| number > hi) {
                    return Err(ValidationError::OutOfRange {
                        field: name.to_string(),
                        min: min.unwrap_or(f64::NEG_INFINITY),
                        max: max.unwrap_or(f64::INFINITY),
                        value: value.clone(),
                    });
                }
            }
            FieldKind::Integer { min, max } => {
                let number = value.as_i64().ok_or_else(|| invalid_type("an integer"))?;
                if min.is_some_and(|lo| number < lo) || max.is_some_and(|hi| number > hi) {
                    return Err(ValidationError::OutOfRange {
                        field: name.to_string(),
                        min: min.map(|v| v as f64).unwrap_or(f64::NEG_INFINITY),
                        max: max.map(|v| v as f64).unwrap_or(f64::INFINITY),
                        value: value.clone(),
                    });
                }
            }
            FieldKind::Boolean => {
                value.as_bool().ok_or_else(|| invalid_type("a boolean"))?;
            }
        }

        Ok(())
    }

    fn to_json(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(self.type_name()));
        if !self.description.is_empty() {
            prop.insert("description".to_string(), json!(self.description));
        }
        match &self.kind {
            FieldKind::String {
                enum_values: Some(values),
            } => {
                prop.insert("enum".to_string(), json!(values));
            }
            FieldKind::Number { min, max } => {
                if let Some(lo) = min {
                    prop.insert("minimum".to_string(), json!(lo));
                }
                if let Some(hi) = max {
                    prop.insert("maximum".to_string(), json!(hi));
                }
            }
            FieldKind::Integer { min, max } => {
                if let Some(lo) = min {
                    prop.insert("minimum".to_string(), json!(lo));
                }
                if let Some(hi) = max {
                    prop.insert("maximum".to_string(), json!(hi));
                }
            }
            _ => {}
        }
        if let Some(default) = &self.default {
            prop.insert("default".to_string(), default.clone());
        }
        Value::Object(prop)
    }
}

/// Input contract for one tool: an ordered property map plus the
/// `additionalProperties` switch. Immutable once the tool is registered.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    properties: Vec<(String, FieldSpec)>,
    additional_properties: bool,
}

impl InputSchema {
    /// Strict schema: keys outside `properties` are rejected.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            additional_properties: false,
        }
    }

    /// Schema that tolerates (and drops) unknown keys.
    pub fn permissive() -> Self {
        Self {
            properties: Vec::new(),
            additional_properties: true,
        }
    }

    pub fn field(mut self, name: &str, spec: FieldSpec) -> Self {
        self.properties.push((name.to_string(), spec));
        self
    }

    pub fn to_json(&self) -> Value {
        let mut props = Map::new();
        let mut required = Vec::new();
        for (name, spec) in &self.properties {
            props.insert(name.clone(), spec.to_json());
            if spec.required {
                required.push(json!(name));
            }
        }
        json!({
            "type": "object",
            "properties": props,
            "required": required,
            "additionalProperties": self.additional_properties,
        })
    }

    /// Pure function of (schema, arguments): checks unexpected keys,
    /// missing required fields, then per-field constraints, and applies
    /// declared defaults for absent optional fields.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<ValidatedArgs, ValidationError> {
        if !self.additional_properties {
            let unexpected: Vec<String> = args
                .keys()
                .filter(|key| !self.properties.iter().any(|(name, _)| name == *key))
                .cloned()
                .collect();
            if !unexpected.is_empty() {
                return Err(ValidationError::UnexpectedFields { fields: unexpected });
            }
        }

        let mut validated = Map::new();
        for (name, spec) in &self.properties {
            let Some(value) = args.get(name).filter(|v| !v.is_null()) else {
                if spec.required {
                    return Err(ValidationError::MissingField { field: name.clone() });
                }
                if let Some(default) = &spec.default {
                    validated.insert(name.clone(), default.clone());
                }
                continue;
            };
            spec.check(name, value)?;
            validated.insert(name.clone(), value.clone());
        }

        Ok(ValidatedArgs(validated))
    }
}

/// Arguments that passed validation, with defaults filled in. Owned by
/// exactly one in-flight call.
#[derive(Debug, Clone)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Decode into the handler's typed input. Validation has already run,
    /// so a decode failure here is an internal contract bug.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ToolError::Internal(anyhow::anyhow!("argument decode failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn location_schema() -> InputSchema {
        InputSchema::new()
            .field(
                "lat",
                FieldSpec::number("Latitude coordinate").required(),
            )
            .field(
                "lng",
                FieldSpec::number("Longitude coordinate").required(),
            )
            .field(
                "page",
                FieldSpec::integer("Page number").default_value(json!(1)),
            )
            .field(
                "size",
                FieldSpec::integer("Results per page").default_value(json!(10)),
            )
            .field("cuisine", FieldSpec::string("Cuisine filter"))
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let err = location_schema()
            .validate(&args(json!({"lat": 25.2})))
            .unwrap_err();
        assert!(err.to_string().contains("lng"), "got: {err}");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = location_schema()
            .validate(&args(json!({"lat": 25.2, "lng": null})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn test_unexpected_key_rejected_when_strict() {
        let err = location_schema()
            .validate(&args(json!({"lat": 1.0, "lng": 2.0, "radius": 5})))
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected field(s): radius");
    }

    #[test]
    fn test_permissive_schema_drops_unknown_keys() {
        let schema = InputSchema::permissive().field("q", FieldSpec::string("query").required());
        let validated = schema
            .validate(&args(json!({"q": "milk", "tracking": true})))
            .unwrap();
        assert_eq!(validated.get("q"), Some(&json!("milk")));
        assert!(validated.get("tracking").is_none());
    }

    #[test]
    fn test_defaults_applied_for_absent_optional_fields() {
        let validated = location_schema()
            .validate(&args(json!({"lat": 25.2, "lng": 55.27})))
            .unwrap();
        assert_eq!(validated.get("page"), Some(&json!(1)));
        assert_eq!(validated.get("size"), Some(&json!(10)));
        assert!(validated.get("cuisine").is_none());
    }

    #[test]
    fn test_type_mismatch_names_field_and_value() {
        let err = location_schema()
            .validate(&args(json!({"lat": "north", "lng": 55.0})))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("lat"));
        assert!(message.contains("number"));
        assert!(message.contains("north"));
    }

    #[test]
    fn test_integer_rejects_fractional_value() {
        let err = location_schema()
            .validate(&args(json!({"lat": 1.0, "lng": 2.0, "page": 1.5})))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn test_integer_bounds_enforced() {
        let schema = InputSchema::new().field(
            "urgency",
            FieldSpec::integer("Urgency level").bounds(1, 5),
        );
        assert!(schema.validate(&args(json!({"urgency": 3}))).is_ok());
        let err = schema.validate(&args(json!({"urgency": 9}))).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_enum_membership_enforced() {
        let schema = InputSchema::new().field(
            "purpose",
            FieldSpec::one_of("Property purpose", &["rent", "buy"]),
        );
        assert!(schema.validate(&args(json!({"purpose": "rent"}))).is_ok());
        let err = schema
            .validate(&args(json!({"purpose": "lease"})))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("rent"));
        assert!(message.contains("lease"));
    }

    #[test]
    fn test_validated_args_parse_into_typed_input() {
        #[derive(Debug, Deserialize)]
        struct Input {
            lat: f64,
            lng: f64,
            page: u32,
            size: u32,
            cuisine: Option<String>,
        }

        let input: Input = location_schema()
            .validate(&args(json!({"lat": 25.2, "lng": 55.27, "cuisine": "thai"})))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(input.page, 1);
        assert_eq!(input.size, 10);
        assert!((input.lat - 25.2).abs() < f64::EPSILON);
        assert!((input.lng - 55.27).abs() < f64::EPSILON);
        assert_eq!(input.cuisine.as_deref(), Some("thai"));
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = location_schema().to_json();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["lat"]["type"], "number");
        assert_eq!(schema["properties"]["page"]["default"], 1);
        assert_eq!(schema["required"], json!(["lat", "lng"]));
        assert_eq!(schema["additionalProperties"], false);
    }
}
