//! HTTP API route definitions.

use std::time::Instant;

use axum::extract::{MatchedPath, OriginalUri, Request};
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, create_item, health, hello, list_items, metrics_export, AppState};
use crate::config::Config;
use crate::metrics::record_http_latency;
use crate::model::{CreateItem, Item};

/// OpenAPI document for the public API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_items,
        handlers::create_item,
        handlers::hello,
        handlers::health
    ),
    components(schemas(Item, CreateItem, handlers::HelloResponse)),
    tags(
        (name = "items", description = "Item list and create"),
        (name = "misc", description = "Greeting and liveness")
    )
)]
pub struct ApiDoc;

/// Paths served under `/api`, each ending in a slash.
const API_PATHS: [&str; 3] = ["/items/", "/hello/", "/health/"];

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route(API_PATHS[0], get(list_items).post(create_item))
        .route(API_PATHS[1], get(hello))
        .route(API_PATHS[2], get(health))
        .route_layer(middleware::from_fn(track_latency))
        .fallback(append_slash);

    Router::new()
        .nest("/api", api)
        .route("/metrics", get(metrics_export))
        .merge(SwaggerUi::new("/api/docs").url("/api/schema/", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from configured origins; no origins means any.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Redirect `/api/items` to `/api/items/` (301), keeping the query string.
/// Anything else unmatched under `/api` is a 404.
async fn append_slash(uri: Uri, OriginalUri(original): OriginalUri) -> Response {
    let path = uri.path();
    if path.ends_with('/') || !API_PATHS.contains(&format!("{path}/").as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let location = match original.query() {
        Some(query) => format!("{}/?{}", original.path(), query),
        None => format!("{}/", original.path()),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

async fn track_latency(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    record_http_latency(start, &endpoint);
    response
}
