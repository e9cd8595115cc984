use crate::{
    adapters::{
        gateway::{GatewayEndpoints, HttpRegistrationGateway},
        http::{app_state::AppState, templates::Templates},
    },
    application::use_cases::in_flight::InFlightUpdates,
    infra::{config::AppConfig, error::InfraError, http_client::try_build_client},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_app_state() -> Result<AppState, InfraError> {
    let config = AppConfig::from_env();

    let endpoints = GatewayEndpoints::new(
        &config.gateway_url,
        &config.gateway_list_path,
        &config.gateway_update_path,
    )
    .map_err(InfraError::GatewayEndpoints)?;
    let gateway = HttpRegistrationGateway::new(try_build_client()?, endpoints);

    let templates = Templates::new().map_err(InfraError::Templates)?;

    Ok(AppState {
        config: Arc::new(config),
        gateways: Arc::new(gateway),
        templates: Arc::new(templates),
        in_flight: InFlightUpdates::new(),
    })
}

pub fn init_tracing(log_file: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "regdesk=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), only when configured
    let json_layer = log_file.and_then(|path| match File::create(path) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        ),
        Err(e) => {
            eprintln!("cannot create log file {}: {}", path, e);
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
