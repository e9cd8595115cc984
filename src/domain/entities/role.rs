use serde::{Deserialize, Serialize};

/// Role claim carried by an identity.
///
/// `Student` is the fallback for identities without a privileged claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SchoolOfficial,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SchoolOfficial => "school_official",
            Role::Student => "student",
        }
    }

    /// Parse a role claim as issued by the identity provider.
    ///
    /// Returns `None` for claims this dashboard has no use for.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "school_official" => Some(Role::SchoolOfficial),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Whether this role may approve or reject registrations.
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Admin | Role::SchoolOfficial)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_claim(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}
