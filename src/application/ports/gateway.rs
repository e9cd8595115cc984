use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{
    app_error::AppResult,
    domain::entities::registration::{Registration, RegistrationStatus},
};

/// Remote service holding the registrations.
///
/// Visibility scoping and transition checks happen on the service side:
/// admins see everything, school officials their school, everyone else
/// their own entries.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn list_registrations(&self) -> AppResult<Vec<Registration>>;

    async fn update_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> AppResult<()>;
}

/// Hands out gateways that act on behalf of a particular caller.
///
/// The registration service scopes results by the caller's credentials, so
/// each request gets a gateway carrying that request's session token.
pub trait GatewayFactory: Send + Sync {
    fn for_caller(&self, token: Option<SecretString>) -> Arc<dyn RegistrationGateway>;
}
