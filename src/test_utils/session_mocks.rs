//! In-memory session provider for view and route tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    app_error::AppResult,
    application::ports::session::{AuthBroadcast, AuthEvent, AuthSubscription, SessionProvider},
    domain::entities::identity::Identity,
};

/// In-memory implementation of SessionProvider for testing.
#[derive(Default)]
pub struct InMemorySession {
    identity: Mutex<Option<Identity>>,
    broadcast: AuthBroadcast,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl InMemorySession {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
            ..Self::default()
        }
    }

    /// Simulate the identity provider completing a sign-in.
    pub fn sign_in(&self, identity: Identity) {
        *self.identity.lock().unwrap() = Some(identity.clone());
        self.broadcast.publish(AuthEvent::SignedIn(identity));
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcast.subscriber_count()
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for InMemorySession {
    fn current_user(&self) -> Option<Identity> {
        self.identity.lock().unwrap().clone()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.broadcast.subscribe()
    }

    async fn login(&self) -> AppResult<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> AppResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        *self.identity.lock().unwrap() = None;
        self.broadcast.publish(AuthEvent::SignedOut);
        Ok(())
    }
}
