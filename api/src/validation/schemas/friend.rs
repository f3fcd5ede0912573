use shared::{Entity, FriendStatus, Operation};

use crate::validation::schema::{FieldSpec, OperationSchema};

pub fn schemas() -> Vec<OperationSchema> {
    vec![
        OperationSchema::new(Entity::Friend, Operation::Create)
            .strict()
            .field(FieldSpec::string("friendId").required_with("Friend ID is required")),
        OperationSchema::new(Entity::Friend, Operation::Update)
            .field(FieldSpec::one_of("status", FriendStatus::VALUES)),
    ]
}
