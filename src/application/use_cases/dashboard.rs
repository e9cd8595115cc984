use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::{
    application::{
        ports::{
            gateway::RegistrationGateway,
            session::{AuthEvent, AuthSubscription, SessionProvider},
        },
        use_cases::in_flight::InFlightUpdates,
        view_model::DashboardPage,
    },
    domain::entities::{
        identity::Identity,
        registration::{Decision, Registration},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Loading,
    Ready(Vec<Registration>),
}

/// Why a decision was dropped without calling the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NotSignedIn,
    NotReviewer,
    NotLoaded,
    UnknownRegistration,
    NotPending,
    UpdateInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The gateway accepted the update and the list was re-fetched.
    Applied,
    /// The gateway call failed; the list was left as it was.
    Failed,
    Ignored(IgnoredReason),
}

/// The registration dashboard.
///
/// Owns the only local copy of the registration list. Every fetch replaces
/// that copy wholesale, and every accepted update is followed by a fetch.
/// Gateway failures never escape: they are logged and the view degrades to
/// an empty or unchanged list.
pub struct DashboardView {
    session: Arc<dyn SessionProvider>,
    gateway: Arc<dyn RegistrationGateway>,
    identity: Option<Identity>,
    state: ViewState,
    subscription: Option<AuthSubscription>,
    mounted: bool,
    in_flight: InFlightUpdates,
}

impl DashboardView {
    pub fn new(session: Arc<dyn SessionProvider>, gateway: Arc<dyn RegistrationGateway>) -> Self {
        Self {
            session,
            gateway,
            identity: None,
            state: ViewState::Unauthenticated,
            subscription: None,
            mounted: false,
            in_flight: InFlightUpdates::new(),
        }
    }

    /// Share in-flight updates with other views, so a registration already
    /// being updated elsewhere is refused here too.
    pub fn with_in_flight(mut self, in_flight: InFlightUpdates) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn registrations(&self) -> &[Registration] {
        match &self.state {
            ViewState::Ready(list) => list,
            _ => &[],
        }
    }

    /// Current render model.
    pub fn page(&self) -> DashboardPage {
        match (&self.identity, &self.state) {
            (None, _) | (_, ViewState::Unauthenticated) => DashboardPage::login_prompt(),
            (Some(identity), ViewState::Loading) => DashboardPage::loading(identity),
            (Some(identity), ViewState::Ready(list)) => {
                DashboardPage::ready(identity, list, |id| self.in_flight.contains(id))
            }
        }
    }

    /// Subscribe to identity changes and run the initial identity check.
    ///
    /// Only the first call has any effect.
    #[instrument(skip(self))]
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.subscription = Some(self.session.subscribe());

        let current = self.session.current_user();
        self.apply_identity(current).await;
    }

    /// Drop the auth subscription. The view keeps its last state.
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.mounted = false;
    }

    #[instrument(skip(self, event))]
    pub async fn on_auth_change(&mut self, event: AuthEvent) {
        self.apply_identity(event.identity().cloned()).await;
    }

    /// Apply every auth event already delivered to the subscription.
    /// Returns how many were applied.
    pub async fn pump_auth_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            self.on_auth_change(event).await;
            applied += 1;
        }
        applied
    }

    /// Wait for the next auth event and apply it.
    ///
    /// Returns `false` when not mounted or the provider has gone away.
    pub async fn process_next_auth_event(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.changed().await {
            Some(event) => {
                self.on_auth_change(event).await;
                true
            }
            None => false,
        }
    }

    /// Hand off to the session provider's sign-in flow.
    ///
    /// The view does not change until the provider reports a new identity.
    #[instrument(skip(self))]
    pub async fn login(&self) {
        if let Err(e) = self.session.login().await {
            error!(error = %e, "Error starting login");
        }
    }

    /// Ask the session provider to end the session.
    ///
    /// The resulting sign-out arrives through the auth subscription.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.session.logout().await {
            error!(error = %e, "Error logging out");
        }
    }

    /// Fetch the registration list and replace the local copy.
    ///
    /// A loaded list stays on screen until the fetch resolves. A failed fetch
    /// leaves an empty list. No call is made while signed out.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        if self.identity.is_none() {
            return;
        }

        let list = match self.gateway.list_registrations().await {
            Ok(list) => {
                info!(count = list.len(), "Loaded registrations");
                list
            }
            Err(e) => {
                error!(error = %e, "Error loading registrations");
                Vec::new()
            }
        };

        self.state = ViewState::Ready(list);
    }

    /// Approve or reject a pending registration, then re-fetch the list.
    ///
    /// A registration takes one update at a time; a decision issued while
    /// another for the same registration is in flight is ignored.
    #[instrument(skip(self))]
    pub async fn decide(&mut self, registration_id: &str, decision: Decision) -> DecisionOutcome {
        if let Err(reason) = self.check_decision(registration_id) {
            warn!(?reason, "Ignoring decision");
            return DecisionOutcome::Ignored(reason);
        }
        let Some(claim) = self.in_flight.claim(registration_id) else {
            warn!(reason = ?IgnoredReason::UpdateInFlight, "Ignoring decision");
            return DecisionOutcome::Ignored(IgnoredReason::UpdateInFlight);
        };

        let outcome = match self
            .gateway
            .update_registration_status(registration_id, decision.target_status())
            .await
        {
            Ok(()) => {
                info!("Registration updated");
                self.refresh().await;
                DecisionOutcome::Applied
            }
            Err(e) => {
                error!(error = %e, "Error updating registration");
                DecisionOutcome::Failed
            }
        };

        drop(claim);
        outcome
    }

    fn check_decision(&self, registration_id: &str) -> Result<(), IgnoredReason> {
        let identity = self.identity.as_ref().ok_or(IgnoredReason::NotSignedIn)?;
        if !identity.can_review() {
            return Err(IgnoredReason::NotReviewer);
        }
        let ViewState::Ready(list) = &self.state else {
            return Err(IgnoredReason::NotLoaded);
        };
        let registration = list
            .iter()
            .find(|r| r.id == registration_id)
            .ok_or(IgnoredReason::UnknownRegistration)?;
        if !registration.status.is_pending() {
            return Err(IgnoredReason::NotPending);
        }
        Ok(())
    }

    async fn apply_identity(&mut self, identity: Option<Identity>) {
        match identity {
            None => {
                if self.identity.take().is_some() {
                    info!("Signed out");
                }
                self.state = ViewState::Unauthenticated;
            }
            Some(identity) => {
                // Visibility is scoped to the caller, so a different user
                // needs a fresh list.
                let same_user = self
                    .identity
                    .as_ref()
                    .is_some_and(|current| current.email == identity.email);
                self.identity = Some(identity);

                if !same_user || matches!(self.state, ViewState::Unauthenticated) {
                    self.state = ViewState::Loading;
                    self.refresh().await;
                }
            }
        }
    }
}
