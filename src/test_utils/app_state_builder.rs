//! Application state wired to in-memory collaborators for route tests.

use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use secrecy::SecretString;
use time::Duration;

use crate::{
    adapters::{
        http::{app_state::AppState, templates::Templates},
        session::jwt,
    },
    application::use_cases::in_flight::InFlightUpdates,
    domain::entities::registration::Registration,
    infra::config::{AppConfig, DEFAULT_LIST_PATH, DEFAULT_UPDATE_PATH},
    test_utils::{InMemoryGateway, SharedGateway},
};

pub const TEST_SESSION_SECRET: &str = "test-session-secret";
pub const TEST_SESSION_COOKIE: &str = "access_token";

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        gateway_url: "http://gateway.invalid/".parse().unwrap(),
        gateway_list_path: DEFAULT_LIST_PATH.to_string(),
        gateway_update_path: DEFAULT_UPDATE_PATH.to_string(),
        session_secret: SecretString::new(TEST_SESSION_SECRET.into()),
        session_cookie: TEST_SESSION_COOKIE.to_string(),
        login_url: "https://id.example.org/login".parse().unwrap(),
        logout_redirect: "/".to_string(),
        log_file: None,
    }
}

/// Session cookie for the standard test reviewer holding `roles`.
pub fn session_cookie(roles: &[&str]) -> Cookie<'static> {
    let token = jwt::issue(
        "user-1",
        "reviewer@example.org",
        Some("Test Reviewer"),
        roles,
        &SecretString::new(TEST_SESSION_SECRET.into()),
        Duration::minutes(15),
    )
    .unwrap();
    Cookie::new(TEST_SESSION_COOKIE, token)
}

#[derive(Default)]
pub struct TestAppStateBuilder {
    registrations: Vec<Registration>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registrations(mut self, registrations: Vec<Registration>) -> Self {
        self.registrations = registrations;
        self
    }

    pub fn build(self) -> (AppState, SharedGateway) {
        let shared = SharedGateway::new(Arc::new(InMemoryGateway::with_registrations(
            self.registrations,
        )));
        let app_state = AppState {
            config: Arc::new(test_config()),
            gateways: Arc::new(shared.clone()),
            templates: Arc::new(Templates::new().unwrap()),
            in_flight: InFlightUpdates::new(),
        };
        (app_state, shared)
    }
}
