use shared::{Entity, Operation, PlanVisibility};

use crate::validation::schema::{FieldSpec, OperationSchema};
use crate::validation::validators::is_empty_or_iso_date;

const INVALID_DATE: &str = "Invalid date format";

fn collaborator(operation: Operation) -> OperationSchema {
    OperationSchema::new(Entity::Plan, operation)
        .strict()
        .field(FieldSpec::string("planId").required_with("Plan ID is required"))
        .field(FieldSpec::string("userId").required_with("User ID is required"))
}

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Plan, Operation::Create)
            .strict()
            .field(FieldSpec::string("title").required_with("Title is required"))
            .field(FieldSpec::string("destination").required_with("Destination is required"))
            .field(FieldSpec::datetime("startDate").required_with("Start date is required"))
            .field(FieldSpec::datetime("endDate").required_with("End date is required"))
            .field(FieldSpec::string("description"))
            .field(FieldSpec::one_of("visibility", PlanVisibility::VALUES))
            .field(FieldSpec::string_array("tags")),
        // Dates may be cleared with an empty string or given as a bare date.
        OperationSchema::new(Entity::Plan, Operation::Update)
            .strict()
            .field(FieldSpec::string("title"))
            .field(FieldSpec::string("destination"))
            .field(FieldSpec::string("description"))
            .field(FieldSpec::string("startDate").refine(is_empty_or_iso_date, INVALID_DATE))
            .field(FieldSpec::string("endDate").refine(is_empty_or_iso_date, INVALID_DATE))
            .field(FieldSpec::one_of("visibility", PlanVisibility::VALUES))
            .field(FieldSpec::string_array("tags")),
        collaborator(Operation::AddCollaborator),
        collaborator(Operation::RemoveCollaborator),
    ]
}
