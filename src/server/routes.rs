use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::attacks::{mug_report, user_attacks_report};
use crate::error::{ApiError, SettingsError};
use crate::rewards::{calculate_war_rewards, RewardSettings};
use crate::server::api::{self, LogRequest};
use crate::torn::fetcher::Transport;
use crate::torn::TornApi;

/// Shared by every handler: how to reach the Torn API.
#[derive(Debug, Clone)]
pub struct ApiState<T> {
    pub transport: T,
    pub api_base: String,
}

impl<T: Transport + Clone> ApiState<T> {
    fn client(&self, api_key: &str) -> TornApi<T> {
        TornApi::with_transport(self.transport.clone(), api_key, self.api_base.clone())
    }
}

pub fn build_router<T>(transport: T, api_base: impl Into<String>) -> Router
where
    T: Transport + Clone + 'static,
{
    let state = ApiState {
        transport,
        api_base: api_base.into(),
    };
    Router::new()
        .route("/api/health", get(health))
        .route("/api/rewards", post(rewards::<T>))
        .route("/api/attacks", post(attacks::<T>))
        .route("/api/mugs", post(mugs::<T>))
        .with_state(state)
}

async fn health() -> Response {
    (StatusCode::OK, Json(api::health_payload())).into_response()
}

async fn rewards<T>(State(state): State<ApiState<T>>, body: String) -> Response
where
    T: Transport + Clone + 'static,
{
    let settings = match RewardSettings::from_json(&body) {
        Ok(settings) => settings,
        Err(err) => return settings_error(err),
    };
    let client = state.client(&settings.api_key);
    match calculate_war_rewards(&client, &settings).await {
        Ok(Some(summary)) => ok_json(&summary),
        Ok(None) => (StatusCode::OK, Json(api::no_data_payload())).into_response(),
        Err(err) => upstream_error(err),
    }
}

async fn attacks<T>(State(state): State<ApiState<T>>, body: String) -> Response
where
    T: Transport + Clone + 'static,
{
    let request = match LogRequest::from_json(&body) {
        Ok(request) => request,
        Err(err) => return settings_error(err),
    };
    let client = state.client(&request.api_key);
    match user_attacks_report(&client, request.count, request.min_respect).await {
        Ok(report) => ok_json(&report),
        Err(err) => upstream_error(err),
    }
}

async fn mugs<T>(State(state): State<ApiState<T>>, body: String) -> Response
where
    T: Transport + Clone + 'static,
{
    let request = match LogRequest::from_json(&body) {
        Ok(request) => request,
        Err(err) => return settings_error(err),
    };
    let client = state.client(&request.api_key);
    match mug_report(&client, request.count).await {
        Ok(report) => ok_json(&report),
        Err(err) => upstream_error(err),
    }
}

fn ok_json<S: Serialize>(payload: &S) -> Response {
    match serde_json::to_value(payload) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

fn settings_error(err: SettingsError) -> Response {
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn upstream_error(err: ApiError) -> Response {
    error!(error = %err, "torn api request failed");
    error_response(StatusCode::BAD_GATEWAY, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}
