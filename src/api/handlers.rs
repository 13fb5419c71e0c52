//! HTTP API handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::error::{ApiError, FieldErrors};
use crate::metrics;
use crate::model::{CreateItem, Item};
use crate::store::ItemStore;

/// Fixed payload of the greeting endpoint.
pub const HELLO_MESSAGE: &str = "Hello from Django!";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Item persistence.
    pub store: ItemStore,
    /// Prometheus exposition handle.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: ItemStore, metrics: PrometheusHandle) -> Self {
        Self { store, metrics }
    }
}

/// Greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    /// Always "Hello from Django!".
    #[schema(example = "Hello from Django!")]
    pub message: &'static str,
}

/// List all items in insertion order.
#[utoipa::path(
    get,
    path = "/api/items/",
    tag = "items",
    responses((status = 200, description = "All items", body = [Item]))
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.store.list().await?;
    debug!(count = items.len(), "Listed items");
    Ok(Json(items))
}

/// Create an item from `{"name": ...}`.
#[utoipa::path(
    post,
    path = "/api/items/",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Field-level validation errors")
    )
)]
#[instrument(skip_all)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        metrics::inc_validation_failures();
        ApiError::MalformedBody(rejection.body_text())
    })?;

    let new_item = CreateItem::parse(&payload).map_err(|errors: FieldErrors| {
        metrics::inc_validation_failures();
        debug!(?errors, "Rejected item");
        ApiError::Validation(errors)
    })?;

    let item = state.store.create(&new_item).await?;
    metrics::inc_items_created();
    info!(id = item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Static greeting; needs no authentication.
#[utoipa::path(
    get,
    path = "/api/hello/",
    tag = "misc",
    responses((status = 200, description = "Greeting", body = HelloResponse))
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: HELLO_MESSAGE,
    })
}

/// Liveness probe - always returns 200 with an empty body.
///
/// Takes no state so it can never touch the database.
#[utoipa::path(
    get,
    path = "/api/health/",
    tag = "misc",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Prometheus text exposition.
pub async fn metrics_export(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
