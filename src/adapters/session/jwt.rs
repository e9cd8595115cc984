//! Session provider backed by the identity provider's signed access token.
//!
//! The token arrives in a cookie. A valid token yields an [`Identity`]; a
//! missing, expired or tampered token means nobody is signed in.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::session::{AuthBroadcast, AuthEvent, AuthSubscription, SessionProvider},
    domain::entities::identity::Identity,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn into_identity(self) -> Identity {
        Identity::from_claims(self.email, self.name, &self.roles)
    }
}

/// Verify an HS256 session token.
pub fn verify(token: &str, secret: &SecretString) -> AppResult<SessionClaims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidCredentials)
}

/// Issue a session token. Used by local tooling and tests; production tokens
/// come from the identity provider.
pub fn issue(
    subject: &str,
    email: &str,
    name: Option<&str>,
    roles: &[&str],
    secret: &SecretString,
    ttl: Duration,
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = SessionClaims {
        sub: subject.to_string(),
        email: email.to_string(),
        name: name.map(str::to_string),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Per-request session provider.
pub struct JwtSession {
    token: Mutex<Option<SecretString>>,
    identity: Mutex<Option<Identity>>,
    broadcast: AuthBroadcast,
}

impl JwtSession {
    /// Build from the raw cookie value, if any.
    pub fn from_token(token: Option<&str>, secret: &SecretString) -> Self {
        let verified = token.and_then(|raw| match verify(raw, secret) {
            Ok(claims) => Some((SecretString::new(raw.into()), claims.into_identity())),
            Err(e) => {
                debug!(error = %e, "Discarding session token");
                None
            }
        });
        let (token, identity) = match verified {
            Some((token, identity)) => (Some(token), Some(identity)),
            None => (None, None),
        };

        Self {
            token: Mutex::new(token),
            identity: Mutex::new(identity),
            broadcast: AuthBroadcast::new(),
        }
    }

    /// The verified token, for forwarding to the registration service.
    pub fn bearer_token(&self) -> Option<SecretString> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SessionProvider for JwtSession {
    fn current_user(&self) -> Option<Identity> {
        self.identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.broadcast.subscribe()
    }

    async fn login(&self) -> AppResult<()> {
        // The browser is sent to the identity provider by the HTTP layer.
        info!("Login requested");
        Ok(())
    }

    async fn logout(&self) -> AppResult<()> {
        let had_session = self
            .identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if had_session {
            info!("Session ended");
            self.broadcast.publish(AuthEvent::SignedOut);
        }
        Ok(())
    }
}
