//! Request validation gate
//!
//! Looks up the schema for an (entity, operation) pair and checks a raw JSON
//! payload against it. Every violated field is reported in one pass; only a
//! missing schema is an `Err`.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use shared::{Entity, Operation};

use super::extractors::{FieldError, ValidationBuilder, ValidationError, ViolationRule};
use super::registry::{RegistryError, SchemaRegistry};
use super::schema::{FieldSpec, OperationSchema, Rule, ValueType};
use super::validators::{parse_datetime, validate_email};

/// A declared field after coercion to its semantic type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

/// Payload holding exactly the declared fields that were supplied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPayload {
    fields: Vec<(&'static str, FieldValue)>,
}

impl NormalizedPayload {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.get(name)? {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for NormalizedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, &value.to_json())?;
        }
        map.end()
    }
}

/// Result of checking one payload
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(NormalizedPayload),
    Invalid(Vec<FieldError>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn violations(&self) -> &[FieldError] {
        match self {
            ValidationOutcome::Valid(_) => &[],
            ValidationOutcome::Invalid(errors) => errors,
        }
    }

    pub fn into_result(self) -> Result<NormalizedPayload, ValidationError> {
        match self {
            ValidationOutcome::Valid(payload) => Ok(payload),
            ValidationOutcome::Invalid(errors) => Err(ValidationError::new(errors)),
        }
    }
}

/// Entry point used by handlers; holds the immutable schema registry
#[derive(Debug, Clone)]
pub struct ValidationGate {
    schemas: Arc<SchemaRegistry>,
}

impl ValidationGate {
    pub fn new(schemas: Arc<SchemaRegistry>) -> Self {
        Self { schemas }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn validate(
        &self,
        entity: Entity,
        operation: Operation,
        payload: &Value,
    ) -> Result<ValidationOutcome, RegistryError> {
        let schema = self.schemas.get(entity, operation)?;
        Ok(validate_payload(schema, payload))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(expected: &str, received: &Value) -> String {
    format!("Expected {}, received {}", expected, kind_of(received))
}

fn coerce(
    name: &str,
    value_type: ValueType,
    raw: &Value,
    builder: &mut ValidationBuilder,
) -> Option<FieldValue> {
    match (value_type, raw) {
        (ValueType::String, Value::String(text)) => Some(FieldValue::Text(text.clone())),
        (ValueType::DateTime, Value::String(text)) => match parse_datetime(text) {
            Ok(dt) => Some(FieldValue::DateTime(dt)),
            Err(message) => {
                builder.add_error(name, ViolationRule::InvalidFormat, message);
                None
            }
        },
        (ValueType::Email, Value::String(text)) => match validate_email(text) {
            Ok(()) => Some(FieldValue::Text(text.clone())),
            Err(message) => {
                builder.add_error(name, ViolationRule::InvalidFormat, message);
                None
            }
        },
        (ValueType::StringArray, Value::Array(items)) => {
            let before = builder.error_count();
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(text) => list.push(text.clone()),
                    other => {
                        builder.add_error(
                            format!("{}[{}]", name, i),
                            ViolationRule::InvalidType,
                            type_mismatch("string", other),
                        );
                    }
                }
            }
            (builder.error_count() == before).then_some(FieldValue::List(list))
        }
        (value_type, other) => {
            builder.add_error(
                name,
                ViolationRule::InvalidType,
                type_mismatch(value_type.expected(), other),
            );
            None
        }
    }
}

fn check_field(
    spec: &FieldSpec,
    raw: Option<&Value>,
    builder: &mut ValidationBuilder,
) -> Option<FieldValue> {
    let Some(raw) = raw else {
        if let Some(message) = spec.required_message() {
            builder.add_error(spec.name, ViolationRule::Required, message);
        }
        return None;
    };

    let mut value = None;
    let mut refined = true;
    for rule in &spec.rules {
        match rule {
            Rule::Required { .. } => {}
            Rule::Type(value_type) => {
                value = Some(coerce(spec.name, *value_type, raw, builder)?);
            }
            Rule::OneOf(literals) => {
                let text = raw.as_str().unwrap_or_default();
                if !literals.iter().any(|literal| *literal == text) {
                    let expected = literals
                        .iter()
                        .map(|literal| format!("'{}'", literal))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    builder.add_error(
                        spec.name,
                        ViolationRule::InvalidEnum,
                        format!("Invalid enum value. Expected {}, received '{}'", expected, text),
                    );
                    return None;
                }
            }
            Rule::Refine { check, message } => {
                if let Some(text) = raw.as_str() {
                    if !check(text) {
                        builder.add_error(spec.name, ViolationRule::Refinement, *message);
                        refined = false;
                    }
                }
            }
        }
    }

    if refined {
        value
    } else {
        None
    }
}

/// Check `payload` against `schema`, collecting every violation
pub fn validate_payload(schema: &OperationSchema, payload: &Value) -> ValidationOutcome {
    let Value::Object(object) = payload else {
        return ValidationOutcome::Invalid(vec![FieldError::new(
            "body",
            ViolationRule::InvalidType,
            type_mismatch("object", payload),
        )]);
    };

    let mut builder = ValidationBuilder::new();
    let mut normalized = NormalizedPayload::default();

    for spec in &schema.fields {
        if let Some(value) = check_field(spec, object.get(spec.name), &mut builder) {
            normalized.fields.push((spec.name, value));
        }
    }

    if schema.strict {
        for key in object.keys().filter(|key| !schema.declares(key)) {
            builder.add_error(
                key.as_str(),
                ViolationRule::UnrecognizedField,
                format!("Unrecognized field '{}'", key),
            );
        }
    }

    match builder.build() {
        Ok(()) => ValidationOutcome::Valid(normalized),
        Err(errors) => ValidationOutcome::Invalid(errors),
    }
}
