//! Schema registry
//!
//! Built once at start-up from the per-entity schema tables and never
//! mutated afterwards.

use std::collections::HashMap;

use shared::{Entity, Operation};
use thiserror::Error;

use super::schema::OperationSchema;
use super::schemas;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no schema registered for {entity}.{operation}")]
    SchemaNotFound { entity: Entity, operation: Operation },
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<(Entity, Operation), OperationSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Registry holding every schema the API declares
    pub fn new() -> Self {
        Self::from_schemas(schemas::all())
    }

    pub fn from_schemas(list: impl IntoIterator<Item = OperationSchema>) -> Self {
        let mut schemas = HashMap::new();
        for schema in list {
            let key = (schema.entity, schema.operation);
            if schemas.insert(key, schema).is_some() {
                tracing::warn!(entity = %key.0, operation = %key.1, "duplicate schema replaced");
            }
        }
        Self { schemas }
    }

    pub fn get(&self, entity: Entity, operation: Operation) -> Result<&OperationSchema, RegistryError> {
        self.schemas
            .get(&(entity, operation))
            .ok_or(RegistryError::SchemaNotFound { entity, operation })
    }

    pub fn contains(&self, entity: Entity, operation: Operation) -> bool {
        self.schemas.contains_key(&(entity, operation))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered schemas, sorted by entity then operation
    pub fn iter(&self) -> impl Iterator<Item = &OperationSchema> {
        let mut list: Vec<_> = self.schemas.values().collect();
        list.sort_by_key(|schema| (schema.entity, schema.operation));
        list.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_pair_is_registered() {
        let registry = SchemaRegistry::new();
        let expected = [
            (Entity::Activity, Operation::Create),
            (Entity::Activity, Operation::Update),
            (Entity::Friend, Operation::Create),
            (Entity::Friend, Operation::Update),
            (Entity::Plan, Operation::Create),
            (Entity::Plan, Operation::Update),
            (Entity::Plan, Operation::AddCollaborator),
            (Entity::Plan, Operation::RemoveCollaborator),
            (Entity::Post, Operation::Create),
            (Entity::Post, Operation::Update),
            (Entity::Public, Operation::Create),
            (Entity::Public, Operation::Update),
            (Entity::Public, Operation::Contact),
            (Entity::Faq, Operation::Create),
            (Entity::Faq, Operation::Update),
        ];
        for (entity, operation) in expected {
            assert!(registry.contains(entity, operation), "{entity}.{operation} missing");
        }
        assert_eq!(registry.len(), expected.len());
    }

    #[test]
    fn missing_pair_is_a_configuration_error() {
        let registry = SchemaRegistry::new();
        let err = registry.get(Entity::Friend, Operation::Contact).unwrap_err();
        assert_eq!(err.to_string(), "no schema registered for Friend.contact");
    }

    #[test]
    fn strictness_is_kept_per_schema() {
        let registry = SchemaRegistry::new();
        let strict = |entity, operation| registry.get(entity, operation).unwrap().strict;

        assert!(strict(Entity::Activity, Operation::Update));
        assert!(strict(Entity::Plan, Operation::Update));
        assert!(strict(Entity::Faq, Operation::Update));
        assert!(!strict(Entity::Post, Operation::Update));
        assert!(!strict(Entity::Public, Operation::Update));
        assert!(!strict(Entity::Friend, Operation::Update));
    }

    #[test]
    fn update_schemas_have_no_required_fields() {
        let registry = SchemaRegistry::new();
        for schema in registry.iter().filter(|s| s.operation == Operation::Update) {
            assert_eq!(
                schema.required_fields().count(),
                0,
                "{}.update declares a required field",
                schema.entity
            );
        }
    }
}
