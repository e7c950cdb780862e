//! HTTP server for the crew spawner.
//!
//! # Endpoints
//!
//! - `GET  /health`            - Liveness probe
//! - `GET  /api/providers`     - Provider availability
//! - `POST /api/process-task`  - Build and run a crew for a task
//! - `POST /api/task-analysis` - Classify a task and suggest agents

pub mod routes;

pub use routes::{app_router, AppState};
