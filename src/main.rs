// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::alarm_service::AlarmService;
use crate::application::dashboard_service::DashboardService;
use crate::application::session::DashboardSession;
use crate::application::view_state::ViewState;
use crate::infrastructure::alarm_webhook::HttpAlarmWebhook;
use crate::infrastructure::config::{load_gateway_config, parse_timezone};
use crate::infrastructure::graphql_repository::GraphqlRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_eink, get_energy, get_overview, get_timeline, get_view, health_check, post_alarm, post_refresh,
    post_view, post_viewport, post_visibility,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_gateway_config()?;
    let display_tz = parse_timezone(&config.display.timezone)?;
    let alarm_tz = parse_timezone(&config.alarm.timezone)?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(GraphqlRepository::new(
        config.graphql.endpoint,
        config.graphql.token,
        Duration::from_secs(config.graphql.timeout_secs),
    )?);
    let webhook = Arc::new(HttpAlarmWebhook::new(
        config.alarm.webhook_url,
        config.alarm.secret,
        Duration::from_secs(config.alarm.timeout_secs),
    )?);

    // Create services (application layer)
    let session = DashboardSession::new(ViewState::default(), display_tz, config.tariff);
    let dashboard_service = DashboardService::new(repository, session, display_tz);
    let alarm_service = AlarmService::new(webhook, alarm_tz);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        alarm_service,
        eink_location: config.display.location,
    });

    // Build router (presentation layer)
    // Compression is negotiated in the response builder, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/timeline", get(get_timeline))
        .route("/overview", get(get_overview))
        .route("/energy", get(get_energy))
        .route("/eink", get(get_eink))
        .route("/session/view", get(get_view).post(post_view))
        .route("/session/refresh", post(post_refresh))
        .route("/session/viewport", post(post_viewport))
        .route("/session/visibility", post(post_visibility))
        .route("/alarm", post(post_alarm))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting home-timeline gateway on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
