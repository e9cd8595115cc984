use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::debug;

use crate::{
    adapters::{http::app_state::AppState, session::jwt::JwtSession},
    app_error::{AppError, AppResult},
    application::{use_cases::dashboard::DashboardView, view_model::DashboardPage},
    domain::entities::registration::Decision,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(page_json))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/registrations/{id}/{decision}", post(decide))
}

/// Build and mount a dashboard for the caller behind `jar`.
///
/// The registration service scopes by caller, so the gateway is bound to the
/// caller's verified session token. In-flight updates are shared across
/// requests.
async fn mounted_view(app_state: &AppState, jar: &CookieJar) -> DashboardView {
    let raw = jar
        .get(&app_state.config.session_cookie)
        .map(|c| c.value().to_string());
    let session = Arc::new(JwtSession::from_token(
        raw.as_deref(),
        &app_state.config.session_secret,
    ));
    let gateway = app_state.gateways.for_caller(session.bearer_token());

    let mut view =
        DashboardView::new(session, gateway).with_in_flight(app_state.in_flight.clone());
    view.mount().await;
    view
}

fn render(app_state: &AppState, page: &DashboardPage) -> AppResult<Html<String>> {
    app_state.templates.render_dashboard(page).map(Html)
}

async fn index(State(app_state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let view = mounted_view(&app_state, &jar).await;
    render(&app_state, &view.page())
}

async fn page_json(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let view = mounted_view(&app_state, &jar).await;
    Ok(Json(view.page()))
}

async fn login(State(app_state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let view = mounted_view(&app_state, &jar).await;
    view.login().await;
    Redirect::to(app_state.config.login_url.as_str())
}

async fn logout(State(app_state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let mut view = mounted_view(&app_state, &jar).await;
    view.logout().await;
    view.pump_auth_events().await;
    debug!(signed_out = view.page().is_login_prompt(), "Logout handled");

    let cookie = Cookie::build((app_state.config.session_cookie.clone(), ""))
        .path("/")
        .build();
    (
        jar.remove(cookie),
        Redirect::to(&app_state.config.logout_redirect),
    )
}

/// Apply a decision, then send the browser back to the dashboard so a
/// reload does not resubmit it.
async fn decide(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path((id, decision)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let decision: Decision = decision.parse().map_err(AppError::InvalidInput)?;

    let mut view = mounted_view(&app_state, &jar).await;
    let outcome = view.decide(&id, decision).await;
    debug!(registration_id = %id, ?decision, ?outcome, "Decision handled");

    Ok(Redirect::to("/"))
}
