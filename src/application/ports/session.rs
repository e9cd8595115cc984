//! Contract for the external identity provider.
//!
//! Identity changes are delivered through an [`AuthSubscription`] handle
//! rather than a registered callback. Dropping the handle removes it from
//! the provider, so a torn-down view never receives stale notifications.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    app_error::AppResult,
    domain::entities::{identity::Identity, role::Role},
};

/// Identity change reported by a session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
}

impl AuthEvent {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthEvent::SignedIn(identity) => Some(identity),
            AuthEvent::SignedOut => None,
        }
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current session state. Never blocks.
    fn current_user(&self) -> Option<Identity>;

    /// Register for identity changes. Ordering and count of events are
    /// provider-defined; zero events is valid.
    fn subscribe(&self) -> AuthSubscription;

    /// Start the external sign-in flow. Completion is reported through
    /// subscriptions, not the return value.
    async fn login(&self) -> AppResult<()>;

    /// End the session. Subscribers observe [`AuthEvent::SignedOut`].
    async fn logout(&self) -> AppResult<()>;
}

pub fn has_role(identity: &Identity, role: Role) -> bool {
    identity.has_role(role)
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<AuthEvent>>,
}

/// Fan-out of auth events to live subscriptions.
///
/// Session provider implementations embed one of these and call
/// [`AuthBroadcast::publish`] whenever their identity changes.
#[derive(Clone, Default)]
pub struct AuthBroadcast {
    inner: Arc<Mutex<Subscribers>>,
}

impl AuthBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = subs.next_id;
        subs.next_id += 1;
        subs.senders.insert(id, tx);

        AuthSubscription {
            id,
            rx,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every live subscription. Returns how many received it.
    pub fn publish(&self, event: AuthEvent) -> usize {
        let mut subs = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        subs.senders.retain(|_, tx| tx.send(event.clone()).is_ok());
        subs.senders.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .senders
            .len()
    }
}

/// Handle for receiving auth events. Unsubscribes on drop.
pub struct AuthSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<AuthEvent>,
    registry: Weak<Mutex<Subscribers>>,
}

impl AuthSubscription {
    /// Wait for the next event. `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<AuthEvent> {
        self.rx.recv().await
    }

    /// Take an already delivered event without waiting.
    pub fn try_next(&mut self) -> Option<AuthEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .senders
                .remove(&self.id);
        }
    }
}

impl std::fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("id", &self.id)
            .finish()
    }
}
