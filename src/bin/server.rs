//! Meta-crew spawner HTTP server binary.
//!
//! # Environment Variables
//!
//! - `HOST` - bind address (default: 0.0.0.0)
//! - `PORT` - HTTP port (default: 5000)
//! - `DEBUG` - "true" lowers the default log filter to debug
//! - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GROQ_API_KEY`, `MISTRAL_API_KEY`
//! - `RUST_LOG` - Tracing filter (overrides the default)
//!
//! A `.env` file in the working directory is loaded first.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use meta_crew_spawner::config::{load_dotenv, log_filter_for, report_dotenv, ServerConfig};
use meta_crew_spawner::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();

    // Initialize tracing before reading settings so their warnings are kept
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter_for(ServerConfig::debug_from_env()).into()),
        )
        .init();

    report_dotenv(&dotenv);
    let config = ServerConfig::from_env();
    tracing::debug!("Server config: {:?}", config);

    let state = AppState::from_env();
    for provider in state.registry.list_providers() {
        if provider.available {
            tracing::info!("Provider {} available ({})", provider.name, provider.default_model);
        } else if let Some(error) = &provider.error {
            tracing::warn!("Provider {} unavailable: {}", provider.name, error);
        }
    }

    let app = app_router(state);
    let bind_addr = config.bind_addr();

    tracing::info!("meta-crew-spawner server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - liveness probe");
    tracing::info!("  GET  /api/providers     - provider availability");
    tracing::info!("  POST /api/process-task  - build and run a crew");
    tracing::info!("  POST /api/task-analysis - classify a task");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
