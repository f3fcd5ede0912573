use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// ENTITIES AND OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Resource kinds exposed by the planner API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    Activity,
    Friend,
    Plan,
    Post,
    Public,
    Faq,
    Request,
    Verification,
}

impl Entity {
    pub const ALL: [Entity; 8] = [
        Entity::Activity,
        Entity::Friend,
        Entity::Plan,
        Entity::Post,
        Entity::Public,
        Entity::Faq,
        Entity::Request,
        Entity::Verification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Activity => "Activity",
            Entity::Friend => "Friend",
            Entity::Plan => "Plan",
            Entity::Post => "Post",
            Entity::Public => "Public",
            Entity::Faq => "Faq",
            Entity::Request => "Request",
            Entity::Verification => "Verification",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown entity: {}", s))
    }
}

/// Named request shape for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Update,
    AddCollaborator,
    RemoveCollaborator,
    Contact,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::AddCollaborator => "addCollaborator",
            Operation::RemoveCollaborator => "removeCollaborator",
            Operation::Contact => "contact",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "addCollaborator" => Ok(Operation::AddCollaborator),
            "removeCollaborator" => Ok(Operation::RemoveCollaborator),
            "contact" => Ok(Operation::Contact),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ENUMERATED FIELD VALUES
// ═══════════════════════════════════════════════════════════════════════════

/// Itinerary item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityCategory {
    EatAndDrink,
    Stays,
    Transportation,
    Custom,
    Activity,
}

impl ActivityCategory {
    pub const VALUES: &'static [&'static str] =
        &["eatAndDrink", "stays", "transportation", "custom", "activity"];
}

/// Who can see a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanVisibility {
    Public,
    Private,
    Friends,
}

impl PlanVisibility {
    pub const VALUES: &'static [&'static str] = &["public", "private", "friends"];
}

/// State of a friendship link between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
    Rejected,
    Blocked,
}

impl FriendStatus {
    pub const VALUES: &'static [&'static str] = &["pending", "accepted", "rejected", "blocked"];
}

/// Kind of static public content page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PublicContentType {
    Faq,
    PrivacyPolicy,
    TermsOfService,
    About,
}

impl PublicContentType {
    pub const VALUES: &'static [&'static str] = &["faq", "privacyPolicy", "termsOfService", "about"];
}
