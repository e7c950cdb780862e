//! Axum route handlers for the spawner HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`            - Returns `{"status": "ok", "version": ..., "service": ...}`
//! - `GET  /api/providers`     - Provider catalog with availability
//! - `POST /api/process-task`  - Analyze, build and run a crew for a task
//! - `POST /api/task-analysis` - Analyze a task and suggest agents
//!
//! Every request gets its own [`CrewSpawner`], so concurrent requests that
//! select different providers never observe each other's configuration.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::crew::{ExecutionEngine, SequentialEngine};
use crate::llm::{LLMFactory, NativeLLMFactory, ProviderRegistry};
use crate::meta_agents::spawner::CrewSpawner;
use crate::tools::{NoTools, ToolResolver};

pub const SERVICE_NAME: &str = "meta-crew-spawner";

/// Provider used by `/api/process-task` when the body names none.
const DEFAULT_PROCESS_PROVIDER: &str = "openai";

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Provider catalog and credentials.
    pub registry: Arc<ProviderRegistry>,
    /// Builds a model client for a resolved provider configuration.
    pub llm_factory: Arc<dyn LLMFactory>,
    /// Runs synthesized crews.
    pub engine: Arc<dyn ExecutionEngine>,
    /// Tools handed to each spawned agent.
    pub tools: Arc<dyn ToolResolver>,
}

impl AppState {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            llm_factory: Arc::new(NativeLLMFactory),
            engine: Arc::new(SequentialEngine),
            tools: Arc::new(NoTools),
        }
    }

    /// State backed by credentials from the process environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(ProviderRegistry::from_env()))
    }

    pub fn with_llm_factory(mut self, factory: Arc<dyn LLMFactory>) -> Self {
        self.llm_factory = factory;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn ExecutionEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_tool_resolver(mut self, tools: Arc<dyn ToolResolver>) -> Self {
        self.tools = tools;
        self
    }

    /// A fresh, unconfigured spawner wired to this state's collaborators.
    fn spawner(&self) -> CrewSpawner {
        CrewSpawner::unconfigured(self.registry.clone())
            .with_llm_factory(self.llm_factory.clone())
            .with_engine(self.engine.clone())
            .with_tool_resolver(self.tools.clone())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Body of the task endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
}

fn internal_error(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Request body, with extractor failures reported in the API's error shape.
fn parse_body(
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<TaskRequest, ApiError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| api_error(rejection.status(), rejection.body_text()))
}

/// Trimmed task text, or 400 when blank.
fn require_task(request: &TaskRequest) -> Result<String, ApiError> {
    let task = request.task.trim();
    if task.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Task description is required",
        ));
    }
    Ok(task.to_string())
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/providers", get(providers_handler))
        .route("/api/process-task", post(process_task_handler))
        .route("/api/task-analysis", post(task_analysis_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": SERVICE_NAME,
    }))
}

/// GET /api/providers
async fn providers_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "providers": state.registry.list_providers(),
    }))
}

/// POST /api/process-task
///
/// Request:  `{ "task": str, "llm_provider"?: str, "model"?: str }`
/// Response: `{ "success": true, "result": str, "agents_created": [...], "execution_time": f64 }`
async fn process_task_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body(payload)?;
    let task = require_task(&request)?;
    let provider = request
        .llm_provider
        .unwrap_or_else(|| DEFAULT_PROCESS_PROVIDER.to_string());
    let model = request.model.unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        let mut spawner = state.spawner();
        spawner
            .configure(&provider, Some(model.as_str()))
            .map_err(|e| e.to_string())?;
        let output = spawner.process_task(&task).map_err(|e| e.to_string())?;
        Ok::<_, String>(json!({
            "success": true,
            "result": output,
            "agents_created": spawner.last_agents_info(),
            "execution_time": spawner.last_execution_time(),
        }))
    })
    .await;

    match result {
        Ok(Ok(body)) => Ok(Json(body)),
        Ok(Err(message)) => {
            tracing::error!("Error processing task: {}", message);
            Err(internal_error(message))
        }
        Err(e) => {
            tracing::error!("Task worker panicked: {}", e);
            Err(internal_error("Internal server error"))
        }
    }
}

/// POST /api/task-analysis
///
/// Uses the requested provider, or the first one with a credential.
async fn task_analysis_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body(payload)?;
    let task = require_task(&request)?;

    let result = tokio::task::spawn_blocking(move || {
        let mut spawner = state.spawner();
        match request.llm_provider.as_deref() {
            Some(provider) => spawner
                .configure(provider, request.model.as_deref())
                .map_err(|e| e.to_string())?,
            None => {
                spawner.configure_default().map_err(|e| e.to_string())?;
            }
        }
        let analysis = spawner.analyze_task(&task).map_err(|e| e.to_string())?;
        Ok::<_, String>(json!({
            "success": true,
            "analysis": analysis,
        }))
    })
    .await;

    match result {
        Ok(Ok(body)) => Ok(Json(body)),
        Ok(Err(message)) => Err(internal_error(message)),
        Err(e) => {
            tracing::error!("Analysis worker panicked: {}", e);
            Err(internal_error("Internal server error"))
        }
    }
}

async fn not_found_handler() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Endpoint not found")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MapCredentials, ProviderConfig};
    use crate::llms::base_llm::{BaseLLM, LLMMessage};
    use crate::utilities::errors::LLMError;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct FakeLLM;

    impl BaseLLM for FakeLLM {
        fn model(&self) -> &str {
            "fake"
        }

        fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
            if messages[1].content.starts_with("Analyze this task: ") {
                Ok("Sure: {\"key_concepts\": [\"solar\"]}".to_string())
            } else {
                Ok("crew says hi".to_string())
            }
        }
    }

    struct FakeFactory;

    impl LLMFactory for FakeFactory {
        fn create(&self, _config: &ProviderConfig) -> Arc<dyn BaseLLM> {
            Arc::new(FakeLLM)
        }
    }

    fn test_app() -> Router {
        let registry = ProviderRegistry::new(Arc::new(
            MapCredentials::new().with("OPENAI_API_KEY", "sk-test"),
        ));
        let state = AppState::new(Arc::new(registry)).with_llm_factory(Arc::new(FakeFactory));
        app_router(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn test_providers_endpoint() {
        let request = Request::builder()
            .uri("/api/providers")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        let providers = json["providers"].as_array().unwrap();
        assert_eq!(providers.len(), 4);
        assert_eq!(providers[0]["name"], "openai");
        assert_eq!(providers[0]["available"], true);
        assert_eq!(providers[1]["available"], false);
        assert_eq!(
            providers[1]["error"],
            "Missing ANTHROPIC_API_KEY environment variable"
        );
    }

    #[tokio::test]
    async fn test_process_task_requires_task() {
        let response = test_app()
            .oneshot(post_json("/api/process-task", json!({"task": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = read_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Task description is required");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/process-task")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["success"], false);
        assert!(!json["error"].as_str().unwrap().is_empty());

        let request = Request::builder()
            .method("POST")
            .uri("/api/task-analysis")
            .body(Body::from("task=hello"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json = read_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_process_task_runs_crew() {
        let response = test_app()
            .oneshot(post_json(
                "/api/process-task",
                json!({"task": "Research solar panels"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["result"], "crew says hi");
        let agents = json["agents_created"].as_array().unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0]["role"], "Senior Research Analyst");
        assert!(json["execution_time"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_process_task_configuration_errors() {
        let response = test_app()
            .oneshot(post_json(
                "/api/process-task",
                json!({"task": "Research solar panels", "llm_provider": "cohere"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Unsupported provider: cohere");

        let response = test_app()
            .oneshot(post_json(
                "/api/process-task",
                json!({"task": "Research solar panels", "llm_provider": "anthropic"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_task_analysis_endpoint() {
        let response = test_app()
            .oneshot(post_json(
                "/api/task-analysis",
                json!({"task": "Research solar panels"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["success"], true);
        let analysis = &json["analysis"];
        assert_eq!(analysis["task_type"], "research");
        assert_eq!(analysis["complexity"], "medium");
        assert_eq!(analysis["key_concepts"][0], "solar");
        assert_eq!(analysis["suggested_agents"][0]["type"], "researcher");
        assert_eq!(analysis["suggested_agents"][1]["type"], "analyst");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let request = Request::builder()
            .uri("/api/nothing")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Endpoint not found");
    }
}
