use crate::config::{AppState, ServerConfig};
use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolhub_core::{DispatchError, RegistryError};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod branding;
mod resources;
mod tools;

/// Start the API server
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/api/health", get(health_check))
        // Branding
        .route("/api/branding/info", get(branding::branding_info))
        .route("/api/branding/theme", get(branding::theme_info))
        .route("/api/branding/contact", get(branding::contact_info))
        // Tools
        .route("/api/tools", get(tools::list_tools).post(tools::create_tool))
        .route("/api/tools/info", get(tools::tool_info))
        .route("/api/tools/stats", get(tools::tool_stats))
        .route("/api/tools/by-capability", get(tools::tools_by_capability))
        .route("/api/tools/exists/{name}", get(tools::tool_exists))
        .route("/api/tools/executions", get(tools::list_executions))
        .route("/api/tools/executions/{execution_id}", get(tools::get_execution))
        .route(
            "/api/tools/{name}",
            get(tools::get_tool)
                .put(tools::update_tool)
                .delete(tools::delete_tool),
        )
        .route("/api/tools/{name}/execute", post(tools::execute_tool))
        // Resources
        .route(
            "/api/resources",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route("/api/resources/info", get(resources::resource_info))
        .route("/api/resources/by-uri", get(resources::get_resource))
        .route("/api/resources/by-mime-type", get(resources::resources_by_mime_type))
        .route("/api/resources/search", get(resources::search_resources))
        .route("/api/resources/exists", get(resources::resource_exists))
        .route("/api/resources/stats", get(resources::resource_stats))
        .route(
            "/api/resources/{uri}",
            axum::routing::put(resources::update_resource).delete(resources::delete_resource),
        )
        .fallback(not_found)
        // Middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": state.app.name,
        "version": state.app.version,
        "timestamp": chrono::Utc::now(),
    }))
}

/// Landing document describing the application and its endpoints
async fn home(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let app = &state.app;
    Json(serde_json::json!({
        "welcome": format!("Welcome to {}", app.name),
        "application": {
            "name": app.name,
            "description": app.description,
            "version": app.version,
            "company": app.company,
            "website": app.website,
        },
        "api_endpoints": {
            "resources": {
                "base_url": "/api/resources",
                "description": "Manage and access resources",
                "methods": "GET, POST, PUT, DELETE",
            },
            "tools": {
                "base_url": "/api/tools",
                "description": "Execute and manage tools",
                "methods": "GET, POST, PUT, DELETE",
            },
            "branding": {
                "base_url": "/api/branding/info",
                "description": "Branding and theme information",
                "methods": "GET",
            },
        },
        "support": {
            "email": app.support.email,
            "phone": app.support.phone,
            "website": app.website,
        },
        "timestamp": chrono::Utc::now(),
        "status": "online",
    }))
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::with_details(
            "The requested resource was not found",
            uri.path(),
        )),
    )
        .into_response()
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Custom error type for API handlers
pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<RegistryError>() {
            return match err {
                RegistryError::DuplicateName(_) | RegistryError::MissingField(_) => {
                    StatusCode::BAD_REQUEST
                }
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            };
        }
        if let Some(DispatchError::ToolNotFound(_)) = self.0.downcast_ref::<DispatchError>() {
            return StatusCode::NOT_FOUND;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_msg = self.0.to_string();
        let details = self.0.chain().skip(1).map(|e| e.to_string()).collect::<Vec<_>>().join(": ");

        let response = if details.is_empty() {
            ErrorResponse::new(error_msg)
        } else {
            ErrorResponse::with_details(error_msg, details)
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (status, Json(response)).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router() -> Router {
        create_router(AppState::new(&ServerConfig::default()))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_and_home() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&router, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["welcome"], "Welcome to Toolhub");
        assert_eq!(body["status"], "online");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"], "/nope");
    }

    #[tokio::test]
    async fn test_branding_info() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/branding/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["application"]["name"], "Toolhub");
        assert_eq!(body["application"]["author"], "Toolhub Team");
        assert_eq!(body["branding"]["primary_color"], "#1f6feb");
        assert!(body["legal"]["terms_url"].as_str().unwrap().ends_with("TERMS.md"));
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_branding_theme_and_contact() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/api/branding/theme", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"]["secondary_color"], "#6e7781");
        assert_eq!(body["theme"]["logo_url"], "/static/logo.svg");
        assert_eq!(body["company"]["name"], "Toolhub Contributors");

        let (status, body) = send(&router, "GET", "/api/branding/contact", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["support"]["email"], "support@toolhub.dev");
        assert!(body["legal"]["privacy_url"].as_str().unwrap().ends_with("PRIVACY.md"));
        assert_eq!(body["legal"]["copyright"], "© Toolhub Contributors");
    }

    #[tokio::test]
    async fn test_resource_info() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/resources/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["api_name"], "Resources API");
        assert!(body["endpoints"]["GET /api/resources/info"].is_string());
        assert_eq!(body["white_label"]["application_name"], "Toolhub");
        assert_eq!(body["white_label"]["support_email"], "support@toolhub.dev");
    }

    #[tokio::test]
    async fn test_list_and_get_tools() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/api/tools", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);

        let (status, body) = send(&router, "GET", "/api/tools/calculator", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tool"]["name"], "calculator");

        let (status, _) = send(&router, "GET", "/api/tools/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&router, "GET", "/api/tools/by-capability?capability=validation", None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["tools"][0]["name"], "data_validator");

        let (_, body) = send(&router, "GET", "/api/tools/exists/text_generator", None).await;
        assert_eq!(body["exists"], true);
    }

    #[tokio::test]
    async fn test_execute_success_and_lookup() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/api/tools/calculator/execute",
            Some(json!({"operation": "add", "a": 2, "b": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let execution = &body["execution"];
        assert_eq!(execution["status"], "success");
        assert_eq!(execution["result"]["result"], 5);

        let id = execution["execution_id"].as_str().unwrap();
        let (status, body) = send(&router, "GET", &format!("/api/tools/executions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["execution"]["execution_id"], id);

        let (_, body) = send(&router, "GET", "/api/tools/executions", None).await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_execute_handler_error_is_recorded() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/api/tools/calculator/execute",
            Some(json!({"operation": "divide", "a": 1, "b": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["execution"]["status"], "error");
        assert!(body["execution"].get("result").is_none());

        let (_, stats) = send(&router, "GET", "/api/tools/stats", None).await;
        assert_eq!(stats["executions_by_status"]["error"], 1);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let router = test_router();

        let (status, body) = send(&router, "POST", "/api/tools/weather/execute", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Tool not found: weather");

        let (_, body) = send(&router, "GET", "/api/tools/executions", None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_tool_crud() {
        let router = test_router();
        let tool = json!({
            "name": "echo",
            "description": "Echo tool",
            "input_schema": {"type": "object"},
            "capabilities": ["demo"]
        });

        let (status, body) = send(&router, "POST", "/api/tools", Some(tool.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tool"]["name"], "echo");

        let (status, body) = send(&router, "POST", "/api/tools", Some(tool)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "'echo' already exists");

        let (status, _) = send(
            &router,
            "POST",
            "/api/tools",
            Some(json!({"name": "", "description": "x", "input_schema": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            "PUT",
            "/api/tools/echo",
            Some(json!({"description": "Echo it back"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tool"]["description"], "Echo it back");
        assert_eq!(body["tool"]["capabilities"], json!(["demo"]));

        let (status, _) = send(&router, "DELETE", "/api/tools/echo", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, "DELETE", "/api/tools/echo", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tool_info() {
        let router = test_router();
        let (status, body) = send(&router, "GET", "/api/tools/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["application"]["name"], "Toolhub");
        assert_eq!(body["available_tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_resource_endpoints() {
        let router = test_router();

        let (_, body) = send(&router, "GET", "/api/resources", None).await;
        assert_eq!(body["total"], 3);

        let (status, body) = send(
            &router,
            "GET",
            "/api/resources/by-uri?uri=mcp://resources/data/users",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"]["name"], "Users Data");

        let (_, body) = send(&router, "GET", "/api/resources/search?name=config", None).await;
        assert_eq!(body["total"], 1);

        let (_, body) = send(
            &router,
            "GET",
            "/api/resources/by-mime-type?mime_type=application/json",
            None,
        )
        .await;
        assert_eq!(body["total"], 2);

        let (_, body) = send(&router, "GET", "/api/resources/exists?uri=mcp://nope", None).await;
        assert_eq!(body["exists"], false);

        let (_, body) = send(&router, "GET", "/api/resources/stats", None).await;
        assert_eq!(body["total_resources"], 3);
    }

    #[tokio::test]
    async fn test_resource_crud() {
        let router = test_router();

        let (status, _) = send(
            &router,
            "POST",
            "/api/resources",
            Some(json!({
                "uri": "mcp://test/note",
                "name": "Note",
                "mime_type": "text/plain",
                "content": "hello"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            "PUT",
            "/api/resources/mcp:%2F%2Ftest%2Fnote",
            Some(json!({"content": "updated"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"]["content"], "updated");

        let (status, _) = send(&router, "DELETE", "/api/resources/mcp:%2F%2Ftest%2Fnote", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &router,
            "POST",
            "/api/resources",
            Some(json!({"uri": "mcp://test/bad", "name": "Bad", "mime_type": "text/plain"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
