//! HTTP API module for the item, greeting, health and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{cors_layer, create_router, ApiDoc};
