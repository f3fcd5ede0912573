//! Custom Axum extractors for validated input
//!
//! `ValidatedPayload<K>` parses a JSON body and runs it through the
//! validation gate for the schema named by `K`, rejecting with a structured
//! 400 that lists every violated field.

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRef, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use shared::{Entity, Operation};
use uuid::Uuid;

use super::gate::{NormalizedPayload, ValidationGate, ValidationOutcome};
use crate::error::ApiError;
use crate::metrics;

/// Which rule a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationRule {
    Required,
    InvalidType,
    InvalidEnum,
    InvalidFormat,
    Refinement,
    UnrecognizedField,
}

/// A field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub rule: ViolationRule,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// Validation error response body
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub code: u16,
    pub timestamp: String,
    pub correlation_id: String,
}

impl ValidationErrorResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        let error_summary = if errors.len() == 1 {
            format!("Validation failed for field '{}'", errors[0].field)
        } else {
            format!("Validation failed for {} fields", errors.len())
        };

        Self {
            error: "ValidationError".to_string(),
            message: error_summary,
            errors,
            code: 400,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Validation error that converts to an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: impl Into<String>, rule: ViolationRule, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, rule, message)],
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed for {} field(s)", self.errors.len())
    }
}

impl std::error::Error for ValidationError {}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let response = ValidationErrorResponse::new(self.errors);
        (StatusCode::BAD_REQUEST, Json(response)).into_response()
    }
}

/// Names the schema a `ValidatedPayload` is checked against
pub trait SchemaKey: Send + Sync + 'static {
    const ENTITY: Entity;
    const OPERATION: Operation;
}

macro_rules! schema_keys {
    ($($key:ident => ($entity:ident, $operation:ident)),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $key;

            impl SchemaKey for $key {
                const ENTITY: Entity = Entity::$entity;
                const OPERATION: Operation = Operation::$operation;
            }
        )*
    };
}

schema_keys! {
    CreateActivity => (Activity, Create),
    UpdateActivity => (Activity, Update),
    CreateFriend => (Friend, Create),
    UpdateFriend => (Friend, Update),
    CreatePlan => (Plan, Create),
    UpdatePlan => (Plan, Update),
    AddCollaborator => (Plan, AddCollaborator),
    RemoveCollaborator => (Plan, RemoveCollaborator),
    CreatePost => (Post, Create),
    UpdatePost => (Post, Update),
    CreatePublic => (Public, Create),
    UpdatePublic => (Public, Update),
    ContactPublic => (Public, Contact),
    CreateFaq => (Faq, Create),
    UpdateFaq => (Faq, Update),
}

/// JSON extractor that validates the body against the schema named by `K`
///
/// Use this instead of `Json<T>` to:
/// 1. Parse JSON from the request body
/// 2. Validate every declared field and reject undeclared ones on strict schemas
/// 3. Return detailed 400 errors for validation failures
///
/// # Example
///
/// ```ignore
/// pub async fn create_plan(
///     ValidatedPayload { payload, .. }: ValidatedPayload<CreatePlan>,
/// ) -> impl IntoResponse {
///     // payload only holds declared, typed fields
/// }
/// ```
pub struct ValidatedPayload<K> {
    pub payload: NormalizedPayload,
    _schema: PhantomData<fn() -> K>,
}

impl<K> ValidatedPayload<K> {
    pub fn into_inner(self) -> NormalizedPayload {
        self.payload
    }
}

fn json_rejection_message(err: &JsonRejection) -> String {
    match err {
        JsonRejection::JsonDataError(e) => format!("Invalid JSON data: {}", e.body_text()),
        JsonRejection::JsonSyntaxError(e) => format!("JSON syntax error: {}", e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Content-Type must be application/json".to_string()
        }
        JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
        _ => "Invalid JSON payload".to_string(),
    }
}

#[async_trait]
impl<S, K> FromRequest<S> for ValidatedPayload<K>
where
    S: Send + Sync,
    K: SchemaKey,
    ValidationGate: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|err| {
                ValidationError::single("body", ViolationRule::InvalidType, json_rejection_message(&err))
                    .into_response()
            })?;

        let gate = ValidationGate::from_ref(state);
        match gate.validate(K::ENTITY, K::OPERATION, &body) {
            Ok(ValidationOutcome::Valid(payload)) => Ok(Self {
                payload,
                _schema: PhantomData,
            }),
            Ok(ValidationOutcome::Invalid(errors)) => {
                metrics::VALIDATION_REJECTIONS
                    .with_label_values(&[K::ENTITY.as_str(), K::OPERATION.as_str()])
                    .inc();
                tracing::debug!(
                    entity = %K::ENTITY,
                    operation = %K::OPERATION,
                    violations = errors.len(),
                    "request payload rejected"
                );
                Err(ValidationError::new(errors).into_response())
            }
            Err(err) => {
                tracing::error!(error = %err, "validation schema missing");
                Err(ApiError::from(err).into_response())
            }
        }
    }
}

impl<K> std::ops::Deref for ValidatedPayload<K> {
    type Target = NormalizedPayload;

    fn deref(&self) -> &Self::Target {
        &self.payload
    }
}

/// Builder for accumulating validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Add an error directly
    pub fn add_error(
        &mut self,
        field: impl Into<String>,
        rule: ViolationRule,
        message: impl Into<String>,
    ) -> &mut Self {
        self.errors.push(FieldError::new(field, rule, message));
        self
    }

    /// Finish building and return Result
    pub fn build(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Get current error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error() {
        let error = FieldError::new("name", ViolationRule::Required, "is required");
        assert_eq!(error.field, "name");
        assert_eq!(error.rule, ViolationRule::Required);
        assert_eq!(error.message, "is required");
    }

    #[test]
    fn test_rule_wire_names() {
        let json = serde_json::to_value(FieldError::new(
            "extra",
            ViolationRule::UnrecognizedField,
            "Unrecognized field 'extra'",
        ))
        .unwrap();
        assert_eq!(json["rule"], "unrecognized_field");
        assert_eq!(json["field"], "extra");
    }

    #[test]
    fn test_validation_builder() {
        let mut builder = ValidationBuilder::new();

        assert_eq!(builder.error_count(), 0);
        builder
            .add_error("name", ViolationRule::Required, "is required")
            .add_error("category", ViolationRule::InvalidEnum, "Invalid enum value");

        assert_eq!(builder.error_count(), 2);

        let errors = builder.build().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "category");
    }

    #[test]
    fn test_validation_error_response() {
        let errors = vec![
            FieldError::new("title", ViolationRule::Required, "Title is required"),
            FieldError::new("startDate", ViolationRule::InvalidFormat, "Invalid datetime"),
        ];

        let response = ValidationErrorResponse::new(errors);

        assert_eq!(response.error, "ValidationError");
        assert_eq!(response.code, 400);
        assert_eq!(response.errors.len(), 2);
        assert!(response.message.contains("2 fields"));
    }

    #[test]
    fn test_single_error_response() {
        let errors = vec![FieldError::new("name", ViolationRule::Required, "is required")];
        let response = ValidationErrorResponse::new(errors);

        assert!(response.message.contains("field 'name'"));
    }

    #[test]
    fn test_schema_keys() {
        assert_eq!(AddCollaborator::ENTITY, Entity::Plan);
        assert_eq!(AddCollaborator::OPERATION, Operation::AddCollaborator);
        assert_eq!(ContactPublic::OPERATION, Operation::Contact);
    }
}
