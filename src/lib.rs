//! Item list/create HTTP backend.
//!
//! Exposes three endpoints under `/api`:
//!
//! ```text
//! GET  /api/items/   list items in insertion order
//! POST /api/items/   create an item from {"name": "..."}
//! GET  /api/hello/   {"message": "Hello from Django!"}
//! GET  /api/health/  empty 200, never touches the database
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`model`]: Item record and create payload validation
//! - [`db`]: Connection pool and migrations
//! - [`store`]: Item persistence
//! - [`api`]: HTTP handlers and routing
//! - [`metrics`]: Prometheus metrics
//! - [`logging`]: Tracing subscriber setup
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
