use std::sync::Arc;

use crate::{
    adapters::http::templates::Templates,
    application::{ports::gateway::GatewayFactory, use_cases::in_flight::InFlightUpdates},
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateways: Arc<dyn GatewayFactory>,
    pub templates: Arc<Templates>,
    /// Status updates in flight across all requests.
    pub in_flight: InFlightUpdates,
}
