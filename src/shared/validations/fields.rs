//! Generic structural checks on JSON objects

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use super::ValidationReport;

/// JSON value kinds, named the way `typeof`-style assertions name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Number,
    /// A number with no fractional part
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// The kind of `value`. Numbers always report [`JsonType::Number`].
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Integer => is_integer(value),
            expected => JsonType::of(value) == *expected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown JSON type name `{0}`")]
pub struct UnknownJsonType(pub String);

impl FromStr for JsonType {
    type Err = UnknownJsonType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" | "int" => Ok(Self::Integer),
            "boolean" | "bool" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "null" => Ok(Self::Null),
            _ => Err(UnknownJsonType(s.to_string())),
        }
    }
}

/// `true` for JSON numbers without a fractional part.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Reports each field of `fields` that is absent or `null` in `obj`.
pub fn validate_required_fields(obj: &Value, fields: &[&str]) -> ValidationReport {
    let Some(map) = obj.as_object() else {
        return ValidationReport::single(format!(
            "expected an object with fields [{}], got {}",
            fields.join(", "),
            JsonType::of(obj)
        ));
    };

    let mut report = ValidationReport::new();
    for field in fields {
        match map.get(*field) {
            None | Some(Value::Null) => report.push(format!("missing required field `{field}`")),
            Some(_) => {}
        }
    }
    report
}

/// Reports each field whose value is not of the expected type.
/// An absent field counts as a mismatch.
pub fn validate_field_types(obj: &Value, expected: &[(&str, JsonType)]) -> ValidationReport {
    let Some(map) = obj.as_object() else {
        return ValidationReport::single(format!("expected an object, got {}", JsonType::of(obj)));
    };

    let mut report = ValidationReport::new();
    for (field, ty) in expected {
        match map.get(*field) {
            None => report.push(format!("field `{field}` is missing (expected {ty})")),
            Some(value) if !ty.matches(value) => report.push(format!(
                "field `{field}` should be {ty}, got {}",
                JsonType::of(value)
            )),
            Some(_) => {}
        }
    }
    report
}

/// Required and typed fields in one pass: absent or `null` fields are reported
/// as missing, present ones must match their type.
pub fn validate_typed_fields(obj: &Value, expected: &[(&str, JsonType)]) -> ValidationReport {
    let names: Vec<&str> = expected.iter().map(|(field, _)| *field).collect();
    let mut report = validate_required_fields(obj, &names);

    let present: Vec<(&str, JsonType)> = expected
        .iter()
        .copied()
        .filter(|(field, _)| obj.get(*field).is_some_and(|v| !v.is_null()))
        .collect();
    if !present.is_empty() {
        report.merge(validate_field_types(obj, &present));
    }
    report
}
