use shared::{Entity, Operation, PublicContentType};

use crate::validation::schema::{FieldSpec, OperationSchema};

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Public, Operation::Create)
            .strict()
            .field(
                FieldSpec::one_of("type", PublicContentType::VALUES)
                    .required_with("Content type is required"),
            )
            .field(FieldSpec::string("title").required_with("Title is required"))
            .field(FieldSpec::string("content").required_with("Content is required")),
        OperationSchema::new(Entity::Public, Operation::Update)
            .field(FieldSpec::string("title"))
            .field(FieldSpec::string("content")),
        OperationSchema::new(Entity::Public, Operation::Contact)
            .strict()
            .field(FieldSpec::string("name").required_with("Name is required"))
            .field(FieldSpec::email("email").required_with("Email is required"))
            .field(FieldSpec::string("subject"))
            .field(FieldSpec::string("message").required_with("Message is required")),
    ]
}
