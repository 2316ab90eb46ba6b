//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, EXPIRES},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use folio_api::{auth_router, bearer_gate};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Creates the main application router.
///
/// Every route sits behind the bearer gate, so handlers mounted here can
/// read the authentication flag and admin routes can add
/// `require_authenticated`.
pub fn create_router(state: AppState) -> Router {
    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .with_state(state.clone());

    let auth = auth_router().with_state(state.auth.clone());

    Router::new()
        .route("/", get(root))
        .merge(health)
        .merge(auth)
        .layer(middleware::from_fn_with_state(state.auth.clone(), bearer_gate))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
}

/// CORS for the site front end.
///
/// `ServerConfig::validate` rejects unparsable origins; should one slip
/// through anyway, no cross-origin request is allowed.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = match config.cors_origin.as_deref() {
        Some(origin) => HeaderValue::from_str(origin).map_or_else(
            |_| AllowOrigin::list(std::iter::empty::<HeaderValue>()),
            AllowOrigin::exact,
        ),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([EXPIRES])
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Alive"
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the OTP secret must be readable.
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.auth.login.store().secret().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
