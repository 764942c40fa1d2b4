//! HTTP transport: REST routes over the record stores.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health`: `{ "ok": true, "weather": n, "sightings": m }`.
//! - `POST|GET /api/v1/weather`, `GET|PATCH|DELETE /api/v1/weather/:id`.
//! - `GET|PUT /api/v1/weather/city/:city`: lookup and upsert by city.
//! - `POST|GET /api/v1/sightings`, `GET|PATCH|DELETE /api/v1/sightings/:id`.
//!
//! List routes accept `?include_deleted=true`. Errors are JSON
//! `{ "code": <status>, "message": "..." }`.
//!
//! Every router built here answers `408` when a request outlives the
//! request timeout and `500` when a handler panics.
//!
//! ## Example
//!
//! ```ignore
//! use skywatch::http::{self, AppState};
//!
//! let state = AppState::new();
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(state.clone());
//!
//! // Or serve directly
//! http::serve(state, "0.0.0.0:8080").await?;
//! ```

mod error;
mod middleware;
mod resource;
mod weather;

pub use error::{ApiError, ErrorBody};
pub use middleware::request_logger;
pub use resource::{Created, ListParams};
pub use weather::UpdateWeatherRequest;

use std::any::Any;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

use crate::domain::{SightingInfo, Weather};
use crate::store::{InMemoryStore, RecordStore};

/// The stores shared by every façade.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub weather: InMemoryStore<Weather>,
    pub sightings: InMemoryStore<SightingInfo>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Request timeout used by [`router`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the REST router over `state` with the default request timeout.
pub fn router(state: AppState) -> Router {
    router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// Build the REST router over `state`.
pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    let weather = resource::routes::<Weather>()
        .merge(weather::routes())
        .with_state(state.weather.clone());
    let sightings = resource::routes::<SightingInfo>().with_state(state.sightings.clone());

    let api = Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
        .nest("/api/v1/weather", weather)
        .nest("/api/v1/sightings", sightings);
    harden(api, request_timeout)
}

/// Wrap `router` in the middleware shared by every router in this crate.
/// The request logger sits outermost so it also records `408` and `500`.
pub fn harden(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(request_logger))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Serve the REST API at the given address (e.g. `"0.0.0.0:8080"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Live record counts per resource.
async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "ok": true,
        "weather": state.weather.len()?,
        "sightings": state.sightings.len()?,
    })))
}
