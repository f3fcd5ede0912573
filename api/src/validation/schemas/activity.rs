use shared::{ActivityCategory, Entity, Operation};

use crate::validation::schema::{FieldSpec, OperationSchema};

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Activity, Operation::Create)
            .strict()
            .field(FieldSpec::string("planId").required_with("Plan ID is required"))
            .field(FieldSpec::string("name").required_with("Activity name is required"))
            .field(
                FieldSpec::one_of("category", ActivityCategory::VALUES)
                    .required_with("Activity category is required"),
            )
            .field(FieldSpec::datetime("startTime"))
            .field(FieldSpec::datetime("endTime"))
            .field(FieldSpec::string("location"))
            .field(FieldSpec::string("notes"))
            .field(FieldSpec::string_array("links")),
        OperationSchema::new(Entity::Activity, Operation::Update)
            .strict()
            .field(FieldSpec::string("name"))
            .field(FieldSpec::one_of("category", ActivityCategory::VALUES))
            .field(FieldSpec::datetime("startTime"))
            .field(FieldSpec::datetime("endTime"))
            .field(FieldSpec::string("location"))
            .field(FieldSpec::string("notes"))
            .field(FieldSpec::string_array("links")),
    ]
}
