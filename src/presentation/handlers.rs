// HTTP request handlers
use crate::application::session::{ViewportAction, VisibilityAction};
use crate::application::view_state::{ViewChange, ViewState, DEFAULT_HOURS};
use crate::domain::error::TimelineError;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct EinkQuery {
    pub location: Option<String>,
    pub hours: Option<u32>,
}

#[derive(Deserialize)]
pub struct AlarmRequest {
    pub trigger_time_ms: i64,
}

#[derive(Serialize)]
struct ViewResponse {
    view: ViewState,
    /// Query string the client should put back in its URL
    query: String,
}

async fn respond<T: Serialize>(headers: &HeaderMap, result: anyhow::Result<T>) -> Response {
    let compress = accepts_brotli(headers);
    let (status, body) = match result {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(value) => (StatusCode::OK, value),
            Err(e) => {
                tracing::error!("Failed to encode response: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        Err(e) => {
            // Bad backend data is the caller's problem to see, not a gateway fault
            let status = if e.downcast_ref::<TimelineError>().is_some() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            tracing::error!("Request failed: {:#}", e);
            (status, json!({ "error": format!("{:#}", e) }))
        }
    };

    match json_response(status, &body, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_timeline(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&headers, state.dashboard_service.timeline().await).await
}

pub async fn get_overview(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&headers, state.dashboard_service.overview().await).await
}

pub async fn get_energy(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&headers, state.dashboard_service.energy().await).await
}

pub async fn get_eink(
    Query(query): Query<EinkQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let location = query.location.unwrap_or_else(|| state.eink_location.clone());
    let hours = query.hours.unwrap_or(DEFAULT_HOURS);
    respond(&headers, state.dashboard_service.eink(&location, hours).await).await
}

/// Current tab/hours, with the query string to put in the URL.
pub async fn get_view(
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let view = state.dashboard_service.view().await;
    let query = view.persist(&raw_query.unwrap_or_default());
    respond(&headers, Ok(ViewResponse { view, query })).await
}

/// Change tab/hours. Accepts a URL query string (`?tab=solar&hours=24`) or a JSON body.
pub async fn post_view(
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Option<Json<ViewChange>>,
) -> Response {
    let raw_query = raw_query.unwrap_or_default();
    let change = match body {
        Some(Json(change)) => change,
        None => ViewChange::from_query(&raw_query),
    };

    let result = state
        .dashboard_service
        .set_view(change.tab, change.hours)
        .await
        .map(|view| ViewResponse {
            query: view.persist(&raw_query),
            view,
        });
    respond(&headers, result).await
}

pub async fn post_refresh(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.dashboard_service.refresh().await;
    respond(&headers, result.map(|applied| json!({ "applied": applied }))).await
}

pub async fn post_viewport(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(action): Json<ViewportAction>,
) -> Response {
    respond(&headers, state.dashboard_service.apply_viewport(&action).await).await
}

pub async fn post_visibility(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(action): Json<VisibilityAction>,
) -> Response {
    respond(&headers, state.dashboard_service.apply_visibility(&action).await).await
}

/// Forward a "next alarm changed" notification to the home webhook.
pub async fn post_alarm(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlarmRequest>,
) -> Response {
    respond(&headers, state.alarm_service.forward(request.trigger_time_ms).await).await
}
