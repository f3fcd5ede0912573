//! List/search query parsing
//!
//! Splits raw query parameters into pagination, a search term and exact-match
//! filters. Keys an entity does not declare as filterable are rejected rather
//! than dropped.

use std::collections::HashMap;

use shared::{Entity, FieldRegistry};

use crate::metrics;
use crate::validation::{ValidationBuilder, ValidationError, ViolationRule};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";
const SEARCH_PARAM: &str = "search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub entity: Entity,
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    /// Declared fields the search term is matched against
    pub search_fields: &'static [&'static str],
    /// (field, value) pairs, sorted by field
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn parse(
        entity: Entity,
        params: &HashMap<String, String>,
        registry: &FieldRegistry,
    ) -> Result<Self, ValidationError> {
        let mut builder = ValidationBuilder::new();
        let filterable = registry.filterable(entity);
        let searchable = registry.searchable(entity);

        let page = parse_number(params, PAGE_PARAM, &mut builder)
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let limit = parse_number(params, LIMIT_PARAM, &mut builder)
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        if (page - 1).checked_mul(limit).is_none() {
            builder.add_error(
                PAGE_PARAM,
                ViolationRule::InvalidType,
                format!("page {} is out of range for limit {}", page, limit),
            );
        }

        let search = params
            .get(SEARCH_PARAM)
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());
        if search.is_some() && searchable.is_empty() {
            builder.add_error(
                SEARCH_PARAM,
                ViolationRule::UnrecognizedField,
                format!("{} does not support search", entity),
            );
        }

        let mut keys: Vec<&String> = params
            .keys()
            .filter(|key| !matches!(key.as_str(), PAGE_PARAM | LIMIT_PARAM | SEARCH_PARAM))
            .collect();
        keys.sort();

        let mut filters = Vec::with_capacity(keys.len());
        for key in keys {
            if filterable.iter().any(|field| *field == key.as_str()) {
                filters.push((key.clone(), params[key].clone()));
            } else {
                builder.add_error(
                    key.as_str(),
                    ViolationRule::UnrecognizedField,
                    format!("'{}' is not a filterable field of {}", key, entity),
                );
            }
        }

        if let Err(errors) = builder.build() {
            metrics::QUERY_REJECTIONS
                .with_label_values(&[entity.as_str()])
                .inc();
            return Err(ValidationError::new(errors));
        }

        Ok(Self {
            entity,
            page,
            limit,
            search,
            search_fields: searchable,
            filters,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// True when the query filters on every declared field and nothing else
    pub fn matches_declared_filters(&self, registry: &FieldRegistry) -> bool {
        registry.matches_filterable(self.entity, self.filters.iter().map(|(key, _)| key.as_str()))
    }
}

fn parse_number(
    params: &HashMap<String, String>,
    key: &str,
    builder: &mut ValidationBuilder,
) -> Option<i64> {
    let raw = params.get(key)?;
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            builder.add_error(key, ViolationRule::InvalidType, "must be an integer");
            None
        }
    }
}
