//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{
    identity::Identity,
    registration::{Registration, RegistrationStatus, School, Student},
    role::Role,
};

/// Fixed timestamp used across fixtures: 2024-03-01 10:00:00 UTC.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

/// Create a test identity holding exactly the given roles.
pub fn create_test_identity(roles: &[Role]) -> Identity {
    let mut identity = Identity::new("reviewer@example.org");
    identity.display_name = Some("Test Reviewer".to_string());
    for role in roles {
        identity = identity.with_role(*role);
    }
    identity
}

/// Create a pending test registration with sensible defaults.
pub fn create_test_registration(
    id: &str,
    overrides: impl FnOnce(&mut Registration),
) -> Registration {
    let mut registration = Registration {
        id: id.to_string(),
        student_id: format!("student-{}", id),
        status: RegistrationStatus::Pending,
        created_at: test_datetime(),
        student: Student {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.org".to_string(),
            project_title: "Compiling Ideas".to_string(),
            category: "Computer Science".to_string(),
            school: School {
                name: "Central High".to_string(),
            },
        },
    };
    overrides(&mut registration);
    registration
}
