use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::gateway::{GatewayFactory, RegistrationGateway},
    domain::entities::registration::{Registration, RegistrationStatus},
};

/// Endpoint locations for the registration service.
#[derive(Debug, Clone)]
pub struct GatewayEndpoints {
    pub list_url: Url,
    pub update_url: Url,
}

impl GatewayEndpoints {
    pub fn new(base: &Url, list_path: &str, update_path: &str) -> AppResult<Self> {
        let list_url = base
            .join(list_path)
            .map_err(|e| AppError::InvalidInput(format!("Invalid list path: {}", e)))?;
        let update_url = base
            .join(update_path)
            .map_err(|e| AppError::InvalidInput(format!("Invalid update path: {}", e)))?;
        Ok(Self {
            list_url,
            update_url,
        })
    }
}

/// HTTP client for the registration service.
///
/// Cheap to clone: the underlying connection pool is shared. Use
/// [`HttpRegistrationGateway::with_bearer`] to act on behalf of a signed-in
/// user so the service can scope results to them.
#[derive(Clone)]
pub struct HttpRegistrationGateway {
    client: Client,
    endpoints: GatewayEndpoints,
    bearer: Option<SecretString>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusBody<'a> {
    registration_id: &'a str,
    status: &'a str,
}

impl HttpRegistrationGateway {
    pub fn new(client: Client, endpoints: GatewayEndpoints) -> Self {
        Self {
            client,
            endpoints,
            bearer: None,
        }
    }

    pub fn with_bearer(&self, token: SecretString) -> Self {
        Self {
            bearer: Some(token),
            ..self.clone()
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl GatewayFactory for HttpRegistrationGateway {
    fn for_caller(&self, token: Option<SecretString>) -> Arc<dyn RegistrationGateway> {
        match token {
            Some(token) => Arc::new(self.with_bearer(token)),
            None => Arc::new(self.clone()),
        }
    }
}

fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::Status(status.as_u16()))
    }
}

fn transport(e: reqwest::Error) -> AppError {
    AppError::Transport(e.to_string())
}

#[async_trait]
impl RegistrationGateway for HttpRegistrationGateway {
    #[instrument(skip(self))]
    async fn list_registrations(&self) -> AppResult<Vec<Registration>> {
        let response = self
            .authorize(self.client.get(self.endpoints.list_url.clone()))
            .send()
            .await
            .map_err(transport)?;

        let body = check_status(response)?.bytes().await.map_err(transport)?;

        serde_json::from_slice(&body).map_err(|e| AppError::Malformed(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn update_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> AppResult<()> {
        let body = UpdateStatusBody {
            registration_id,
            status: status.as_str(),
        };

        let response = self
            .authorize(self.client.put(self.endpoints.update_url.clone()))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        check_status(response)?;
        Ok(())
    }
}
