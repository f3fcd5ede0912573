//! Declarative operation schemas
//!
//! A schema is an ordered list of field specs. Each field spec is an ordered
//! list of [`Rule`]s, evaluated uniformly by the validation gate.

use std::borrow::Cow;

use shared::{Entity, Operation};

/// Message used when a required field carries no custom one
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required";

/// Semantic type of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    StringArray,
    DateTime,
    Email,
}

impl ValueType {
    pub fn expected(&self) -> &'static str {
        match self {
            ValueType::String | ValueType::DateTime | ValueType::Email => "string",
            ValueType::StringArray => "array",
        }
    }
}

/// Predicate over the raw string value of a field
pub type Predicate = fn(&str) -> bool;

/// One check applied to a field
#[derive(Clone)]
pub enum Rule {
    Required { message: Cow<'static, str> },
    Type(ValueType),
    OneOf(&'static [&'static str]),
    Refine {
        check: Predicate,
        message: &'static str,
    },
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required { message } => f.debug_struct("Required").field("message", message).finish(),
            Rule::Type(value_type) => f.debug_tuple("Type").field(value_type).finish(),
            Rule::OneOf(literals) => f.debug_tuple("OneOf").field(literals).finish(),
            Rule::Refine { message, .. } => f.debug_struct("Refine").field("message", message).finish(),
        }
    }
}

/// Declared field of an operation schema
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn typed(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            rules: vec![Rule::Type(value_type)],
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::typed(name, ValueType::String)
    }

    pub fn string_array(name: &'static str) -> Self {
        Self::typed(name, ValueType::StringArray)
    }

    pub fn datetime(name: &'static str) -> Self {
        Self::typed(name, ValueType::DateTime)
    }

    pub fn email(name: &'static str) -> Self {
        Self::typed(name, ValueType::Email)
    }

    /// String restricted to the given literals
    pub fn one_of(name: &'static str, literals: &'static [&'static str]) -> Self {
        let mut spec = Self::string(name);
        spec.rules.push(Rule::OneOf(literals));
        spec
    }

    pub fn required(self) -> Self {
        self.required_with(DEFAULT_REQUIRED_MESSAGE)
    }

    pub fn required_with(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.rules.insert(
            0,
            Rule::Required {
                message: message.into(),
            },
        );
        self
    }

    pub fn refine(mut self, check: Predicate, message: &'static str) -> Self {
        self.rules.push(Rule::Refine { check, message });
        self
    }

    pub fn is_required(&self) -> bool {
        self.required_message().is_some()
    }

    pub fn required_message(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Required { message } => Some(&**message),
            _ => None,
        })
    }

    pub fn value_type(&self) -> ValueType {
        self.rules
            .iter()
            .find_map(|rule| match rule {
                Rule::Type(value_type) => Some(*value_type),
                _ => None,
            })
            .unwrap_or(ValueType::String)
    }
}

/// Request shape for one (entity, operation) pair
#[derive(Debug, Clone)]
pub struct OperationSchema {
    pub entity: Entity,
    pub operation: Operation,
    pub strict: bool,
    pub fields: Vec<FieldSpec>,
}

impl OperationSchema {
    pub fn new(entity: Entity, operation: Operation) -> Self {
        Self {
            entity,
            operation,
            strict: false,
            fields: Vec::new(),
        }
    }

    /// Reject payload keys that are not declared
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|spec| spec.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| spec.is_required())
    }
}
