use shared::{Entity, Operation};

use crate::validation::schema::{FieldSpec, OperationSchema};

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Post, Operation::Create)
            .strict()
            .field(FieldSpec::string("planId").required_with("Plan ID is required"))
            .field(FieldSpec::string("content").required_with("Content is required"))
            .field(FieldSpec::string_array("images")),
        OperationSchema::new(Entity::Post, Operation::Update)
            .field(FieldSpec::string("content"))
            .field(FieldSpec::string_array("images")),
    ]
}
