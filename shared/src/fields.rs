//! Filterable and searchable field declarations
//!
//! List and search endpoints only accept query keys that an entity declares
//! here. Filterable fields are matched exactly; searchable fields take part in
//! substring search.

use std::collections::{HashMap, HashSet};

use crate::models::Entity;

/// Declared query fields for one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub filterable: &'static [&'static str],
    pub searchable: &'static [&'static str],
}

const REQUEST_FIELDS: FieldSet = FieldSet {
    filterable: &["status"],
    searchable: &[],
};

const VERIFICATION_FIELDS: FieldSet = FieldSet {
    filterable: &["type", "otpHash"],
    searchable: &["otpHash"],
};

const NO_FIELDS: FieldSet = FieldSet {
    filterable: &[],
    searchable: &[],
};

/// Immutable per-entity field declarations, built once at start-up
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    sets: HashMap<Entity, FieldSet>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        let mut sets = HashMap::new();
        sets.insert(Entity::Request, REQUEST_FIELDS);
        sets.insert(Entity::Verification, VERIFICATION_FIELDS);
        for entity in [
            Entity::Activity,
            Entity::Friend,
            Entity::Plan,
            Entity::Post,
            Entity::Public,
            Entity::Faq,
        ] {
            sets.insert(entity, NO_FIELDS);
        }
        Self { sets }
    }

    pub fn field_set(&self, entity: Entity) -> FieldSet {
        self.sets.get(&entity).copied().unwrap_or_default()
    }

    pub fn filterable(&self, entity: Entity) -> &'static [&'static str] {
        self.field_set(entity).filterable
    }

    pub fn searchable(&self, entity: Entity) -> &'static [&'static str] {
        self.field_set(entity).searchable
    }

    /// Filterable fields by entity name; unknown names declare nothing
    pub fn filterable_by_name(&self, entity: &str) -> &'static [&'static str] {
        match entity.parse::<Entity>() {
            Ok(entity) => self.filterable(entity),
            Err(_) => {
                tracing::debug!(entity, "no field set registered, nothing is filterable");
                &[]
            }
        }
    }

    /// Searchable fields by entity name; unknown names declare nothing
    pub fn searchable_by_name(&self, entity: &str) -> &'static [&'static str] {
        match entity.parse::<Entity>() {
            Ok(entity) => self.searchable(entity),
            Err(_) => {
                tracing::debug!(entity, "no field set registered, nothing is searchable");
                &[]
            }
        }
    }

    /// True when `keys` is exactly the declared filterable set of `entity`
    pub fn matches_filterable<'a, I>(&self, entity: Entity, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let candidate: HashSet<&str> = keys.into_iter().collect();
        let declared: HashSet<&str> = self.filterable(entity).iter().copied().collect();
        is_valid_field_set(&candidate, &declared)
    }
}

/// Set equality: sizes must match and every candidate must be declared
pub fn is_valid_field_set<S>(candidate: &HashSet<S>, declared: &HashSet<S>) -> bool
where
    S: Eq + std::hash::Hash,
{
    if candidate.len() != declared.len() {
        return false;
    }
    candidate.iter().all(|field| declared.contains(field))
}
