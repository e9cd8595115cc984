use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::entities::role::Role;

/// Authenticated user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: String,
    pub display_name: Option<String>,
    pub roles: BTreeSet<Role>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            roles: BTreeSet::new(),
        }
    }

    /// Build an identity from raw role claims, dropping unknown ones.
    pub fn from_claims<S: AsRef<str>>(
        email: impl Into<String>,
        display_name: Option<String>,
        claims: &[S],
    ) -> Self {
        let roles = claims
            .iter()
            .filter_map(|c| Role::from_claim(c.as_ref()))
            .collect();
        Self {
            email: email.into(),
            display_name: display_name.filter(|n| !n.trim().is_empty()),
            roles,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The role that decides what this identity sees.
    ///
    /// Priority: admin, then school official, then student.
    pub fn primary_role(&self) -> Role {
        if self.has_role(Role::Admin) {
            Role::Admin
        } else if self.has_role(Role::SchoolOfficial) {
            Role::SchoolOfficial
        } else {
            Role::Student
        }
    }

    pub fn can_review(&self) -> bool {
        self.primary_role().can_review()
    }

    /// Name shown in the greeting: display name, falling back to email.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}
