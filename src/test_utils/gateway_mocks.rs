//! In-memory registration gateway for view and route tests.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::gateway::{GatewayFactory, RegistrationGateway},
    domain::entities::registration::{Registration, RegistrationStatus},
};

/// A call observed by [`InMemoryGateway`], in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    List,
    Update {
        registration_id: String,
        status: RegistrationStatus,
    },
}

/// In-memory implementation of RegistrationGateway for testing.
///
/// Updates are applied to the stored list, so a re-fetch observes them.
#[derive(Default)]
pub struct InMemoryGateway {
    pub registrations: Mutex<Vec<Registration>>,
    calls: Mutex<Vec<GatewayCall>>,
    fail_lists: AtomicBool,
    fail_updates: AtomicBool,
    after_update: Mutex<Option<Vec<Registration>>>,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registrations(registrations: Vec<Registration>) -> Self {
        Self {
            registrations: Mutex::new(registrations),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Replace the whole stored list on the next successful update.
    pub fn replace_after_update(&self, registrations: Vec<Registration>) {
        *self.after_update.lock().unwrap() = Some(registrations);
    }

    /// Make the next update call wait until the returned gate is notified.
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl RegistrationGateway for InMemoryGateway {
    async fn list_registrations(&self) -> AppResult<Vec<Registration>> {
        self.calls.lock().unwrap().push(GatewayCall::List);

        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Status(500));
        }
        Ok(self.registrations.lock().unwrap().clone())
    }

    async fn update_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> AppResult<()> {
        self.calls.lock().unwrap().push(GatewayCall::Update {
            registration_id: registration_id.to_string(),
            status,
        });

        let gate = self.update_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection reset".into()));
        }

        if let Some(replacement) = self.after_update.lock().unwrap().take() {
            *self.registrations.lock().unwrap() = replacement;
            return Ok(());
        }

        let mut registrations = self.registrations.lock().unwrap();
        let registration = registrations
            .iter_mut()
            .find(|r| r.id == registration_id)
            .ok_or(AppError::Status(404))?;
        if !registration.status.can_transition_to(status) {
            return Err(AppError::Status(409));
        }
        registration.status = status;
        Ok(())
    }
}

/// Gateway factory handing every caller the same in-memory gateway.
///
/// Records which bearer tokens were presented.
#[derive(Clone)]
pub struct SharedGateway {
    pub gateway: Arc<InMemoryGateway>,
    tokens: Arc<Mutex<Vec<Option<String>>>>,
}

impl SharedGateway {
    pub fn new(gateway: Arc<InMemoryGateway>) -> Self {
        Self {
            gateway,
            tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn presented_tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

impl GatewayFactory for SharedGateway {
    fn for_caller(&self, token: Option<SecretString>) -> Arc<dyn RegistrationGateway> {
        self.tokens
            .lock()
            .unwrap()
            .push(token.map(|t| t.expose_secret().to_string()));
        self.gateway.clone()
    }
}
