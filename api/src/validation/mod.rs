//! Input Validation Module
//!
//! Declarative request validation for the planner API.
//!
//! # Overview
//!
//! 1. **Schemas** - one `OperationSchema` per (entity, operation) pair, built
//!    from ordered field rules (`schema`, `schemas`)
//! 2. **Registry** - immutable lookup of schemas by entity and operation
//! 3. **Gate** - checks a JSON payload against its schema and returns either a
//!    normalized payload or every field violation
//! 4. **Extractors** - `ValidatedPayload<K>`, an Axum extractor running the gate
//!
//! # Usage
//!
//! ```ignore
//! use crate::validation::{keys::CreatePlan, ValidatedPayload};
//!
//! pub async fn create_plan(
//!     ValidatedPayload { payload, .. }: ValidatedPayload<CreatePlan>,
//! ) -> impl IntoResponse {
//!     let title = payload.text("title");
//!     // ...
//! }
//! ```
//!
//! # Validation Error Response
//!
//! When validation fails, a 400 Bad Request is returned:
//!
//! ```json
//! {
//!   "error": "ValidationError",
//!   "message": "Validation failed for 2 fields",
//!   "errors": [
//!     {"field": "title", "rule": "required", "message": "Title is required"},
//!     {"field": "budget", "rule": "unrecognized_field", "message": "Unrecognized field 'budget'"}
//!   ],
//!   "code": 400,
//!   "timestamp": "2026-02-20T10:30:00Z",
//!   "correlation_id": "uuid-here"
//! }
//! ```

pub mod extractors;
pub mod gate;
pub mod registry;
pub mod schema;
mod schemas;
pub mod validators;

// Re-export commonly used items
pub use extractors::{
    FieldError, SchemaKey, ValidatedPayload, ValidationBuilder, ValidationError, ViolationRule,
};
pub use gate::{validate_payload, FieldValue, NormalizedPayload, ValidationGate, ValidationOutcome};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{FieldSpec, OperationSchema, Rule, ValueType};

/// Marker types naming each schema, for use with `ValidatedPayload`
pub mod keys {
    pub use super::extractors::{
        AddCollaborator, ContactPublic, CreateActivity, CreateFaq, CreateFriend, CreatePlan,
        CreatePost, CreatePublic, RemoveCollaborator, UpdateActivity, UpdateFaq, UpdateFriend,
        UpdatePlan, UpdatePost, UpdatePublic,
    };
}
