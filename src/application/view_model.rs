//! Render model for the dashboard.
//!
//! Everything role-dependent is decided here so that templates and JSON
//! consumers only ever print what they are given.

use serde::Serialize;

use crate::domain::entities::{
    identity::Identity,
    registration::{Decision, Registration, RegistrationStatus},
    role::Role,
};

pub const LOGIN_TITLE: &str = "Dashboard";
pub const LOGIN_DESCRIPTION: &str = "Please login to access the dashboard";
pub const LOADING_MESSAGE: &str = "Loading registrations...";
pub const EMPTY_MESSAGE: &str = "No registrations found.";

/// Description line for the registration card, by the identity's primary role.
pub fn scope_description(identity: &Identity) -> &'static str {
    match identity.primary_role() {
        Role::Admin => "All student registrations",
        Role::SchoolOfficial => "Registrations from your school",
        Role::Student => "Your registrations",
    }
}

/// Approve/Reject are offered to reviewers on pending registrations only.
pub fn actions_visible(identity: &Identity, status: RegistrationStatus) -> bool {
    identity.can_review() && status.is_pending()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Warning,
    Success,
    Danger,
}

impl BadgeTone {
    pub fn for_status(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Pending => BadgeTone::Warning,
            RegistrationStatus::Approved => BadgeTone::Success,
            RegistrationStatus::Rejected => BadgeTone::Danger,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeTone::Warning => "badge badge-warning",
            BadgeTone::Success => "badge badge-success",
            BadgeTone::Danger => "badge badge-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowAction {
    pub decision: Decision,
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRow {
    pub id: String,
    pub project_title: String,
    pub student_line: String,
    pub school_line: String,
    pub applied_on: String,
    pub status: RegistrationStatus,
    pub badge: BadgeTone,
    pub badge_class: &'static str,
    pub actions: Vec<RowAction>,
}

impl RegistrationRow {
    pub fn build(registration: &Registration, viewer: &Identity, updating: bool) -> Self {
        let student = &registration.student;
        let badge = BadgeTone::for_status(registration.status);

        let actions = if actions_visible(viewer, registration.status) {
            [Decision::Approve, Decision::Reject]
                .into_iter()
                .map(|decision| RowAction {
                    decision,
                    label: decision.label(),
                    disabled: updating,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: registration.id.clone(),
            project_title: student.project_title.clone(),
            student_line: format!("{} - {}", student.full_name(), student.email),
            school_line: format!(
                "School: {} | Category: {}",
                student.school.name, student.category
            ),
            applied_on: registration.created_at.format("%Y-%m-%d").to_string(),
            status: registration.status,
            badge,
            badge_class: badge.css_class(),
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginPrompt {
    pub title: &'static str,
    pub description: &'static str,
    pub action_label: &'static str,
}

impl Default for LoginPrompt {
    fn default() -> Self {
        Self {
            title: LOGIN_TITLE,
            description: LOGIN_DESCRIPTION,
            action_label: "Login",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationBoard {
    pub greeting: String,
    pub description: &'static str,
    pub rows: Vec<RegistrationRow>,
    pub empty_message: Option<&'static str>,
}

/// What the dashboard shows right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardPage {
    LoginPrompt(LoginPrompt),
    Loading { greeting: String, message: &'static str },
    Ready(RegistrationBoard),
}

impl DashboardPage {
    pub fn login_prompt() -> Self {
        DashboardPage::LoginPrompt(LoginPrompt::default())
    }

    pub fn loading(viewer: &Identity) -> Self {
        DashboardPage::Loading {
            greeting: greeting(viewer),
            message: LOADING_MESSAGE,
        }
    }

    /// `updating` reports registrations with an update in flight; their
    /// actions render disabled.
    pub fn ready(
        viewer: &Identity,
        registrations: &[Registration],
        updating: impl Fn(&str) -> bool,
    ) -> Self {
        let rows: Vec<RegistrationRow> = registrations
            .iter()
            .map(|r| RegistrationRow::build(r, viewer, updating(&r.id)))
            .collect();
        let empty_message = rows.is_empty().then_some(EMPTY_MESSAGE);

        DashboardPage::Ready(RegistrationBoard {
            greeting: greeting(viewer),
            description: scope_description(viewer),
            rows,
            empty_message,
        })
    }

    pub fn is_login_prompt(&self) -> bool {
        matches!(self, DashboardPage::LoginPrompt(_))
    }
}

fn greeting(viewer: &Identity) -> String {
    format!("Welcome back, {}", viewer.greeting_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_identity, create_test_registration};

    #[test]
    fn description_follows_role_priority() {
        let admin = create_test_identity(&[Role::Admin, Role::SchoolOfficial]);
        let official = create_test_identity(&[Role::SchoolOfficial]);
        let student = create_test_identity(&[]);

        assert_eq!(scope_description(&admin), "All student registrations");
        assert_eq!(
            scope_description(&official),
            "Registrations from your school"
        );
        assert_eq!(scope_description(&student), "Your registrations");
    }

    #[test]
    fn actions_only_for_reviewers_on_pending() {
        let statuses = [
            RegistrationStatus::Pending,
            RegistrationStatus::Approved,
            RegistrationStatus::Rejected,
        ];
        let viewers = [
            (create_test_identity(&[Role::Admin]), true),
            (create_test_identity(&[Role::SchoolOfficial]), true),
            (create_test_identity(&[Role::Student]), false),
            (create_test_identity(&[]), false),
        ];

        for (viewer, reviewer) in &viewers {
            for status in statuses {
                let expected = *reviewer && status == RegistrationStatus::Pending;
                assert_eq!(actions_visible(viewer, status), expected);
            }
        }
    }

    #[test]
    fn row_formats_student_and_school() {
        let reg = create_test_registration("r1", |r| {
            r.student.first_name = "Ada".into();
            r.student.last_name = "Lovelace".into();
            r.student.email = "ada@example.org".into();
            r.student.category = "Physics".into();
            r.student.school.name = "North High".into();
        });
        let viewer = create_test_identity(&[Role::Admin]);

        let row = RegistrationRow::build(&reg, &viewer, false);

        assert_eq!(row.student_line, "Ada Lovelace - ada@example.org");
        assert_eq!(row.school_line, "School: North High | Category: Physics");
        assert_eq!(row.applied_on, "2024-03-01");
        assert_eq!(row.badge, BadgeTone::Warning);
        let labels: Vec<_> = row.actions.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Approve", "Reject"]);
        assert!(row.actions.iter().all(|a| !a.disabled));
    }

    #[test]
    fn busy_rows_render_disabled_actions() {
        let reg = create_test_registration("r1", |_| {});
        let viewer = create_test_identity(&[Role::SchoolOfficial]);

        let row = RegistrationRow::build(&reg, &viewer, true);

        assert_eq!(row.actions.len(), 2);
        assert!(row.actions.iter().all(|a| a.disabled));
    }

    #[test]
    fn approved_row_for_student_has_success_badge_and_no_actions() {
        let reg = create_test_registration("r1", |r| r.status = RegistrationStatus::Approved);
        let viewer = create_test_identity(&[]);

        let row = RegistrationRow::build(&reg, &viewer, false);

        assert!(row.actions.is_empty());
        assert_eq!(row.badge, BadgeTone::Success);
        assert_eq!(row.badge_class, "badge badge-success");
    }

    #[test]
    fn empty_board_carries_empty_message() {
        let viewer = create_test_identity(&[Role::Admin]);
        let DashboardPage::Ready(board) = DashboardPage::ready(&viewer, &[], |_| false) else {
            panic!("expected ready page");
        };

        assert_eq!(board.empty_message, Some(EMPTY_MESSAGE));
        assert!(board.rows.is_empty());
    }

    #[test]
    fn page_serializes_with_kind_tag() {
        let json = serde_json::to_value(DashboardPage::login_prompt()).unwrap();
        assert_eq!(json["kind"], "login_prompt");
        assert_eq!(json["description"], LOGIN_DESCRIPTION);
    }
}
