use shared::{Entity, Operation};

use crate::validation::schema::{FieldSpec, OperationSchema};

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Faq, Operation::Create)
            .strict()
            .field(FieldSpec::string("question").required_with("Question is required"))
            .field(FieldSpec::string("answer").required_with("Answer is required")),
        OperationSchema::new(Entity::Faq, Operation::Update)
            .strict()
            .field(FieldSpec::string("question"))
            .field(FieldSpec::string("answer")),
    ]
}
