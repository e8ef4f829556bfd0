use super::ApiResult;
use crate::config::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use toolhub_core::{
    Arguments, ExecutionId, ExecutionRecord, RegistryError, ToolDefinition, ToolPatch, ToolStats,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolDefinition>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool: ToolDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteToolResponse {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolExistsResponse {
    pub tool_name: String,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub execution: ExecutionRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListExecutionsResponse {
    pub executions: Vec<ExecutionRecord>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CapabilityQuery {
    pub capability: String,
}

/// List all tools
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ListToolsResponse> {
    let tools = state.dispatcher.list_tools();
    Json(ListToolsResponse {
        total: tools.len(),
        tools,
        capability: None,
    })
}

/// Get a tool by name
pub async fn get_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<ToolResponse>> {
    let tool = state
        .dispatcher
        .find_tool(&name)
        .ok_or(RegistryError::NotFound(name))?;

    Ok(Json(ToolResponse { tool, message: None }))
}

/// List tools carrying a capability tag
pub async fn tools_by_capability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CapabilityQuery>,
) -> Json<ListToolsResponse> {
    let tools = state.dispatcher.tools_by_capability(&query.capability);
    Json(ListToolsResponse {
        total: tools.len(),
        tools,
        capability: Some(query.capability),
    })
}

/// Register a new tool
pub async fn create_tool(
    State(state): State<Arc<AppState>>,
    Json(def): Json<ToolDefinition>,
) -> ApiResult<Json<ToolResponse>> {
    let tool = state.dispatcher.register_tool(def)?;
    Ok(Json(ToolResponse {
        tool,
        message: Some("Tool created".to_string()),
    }))
}

/// Partially update a tool
pub async fn update_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(patch): Json<ToolPatch>,
) -> ApiResult<Json<ToolResponse>> {
    let tool = state.dispatcher.update_tool(&name, patch)?;
    Ok(Json(ToolResponse {
        tool,
        message: Some("Tool updated".to_string()),
    }))
}

pub async fn delete_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<DeleteToolResponse>> {
    if !state.dispatcher.delete_tool(&name) {
        return Err(RegistryError::NotFound(name).into());
    }
    Ok(Json(DeleteToolResponse {
        name,
        message: "Tool deleted".to_string(),
    }))
}

/// Execute a tool; the request body is the argument object
pub async fn execute_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(arguments): Json<Arguments>,
) -> ApiResult<Json<ExecutionResponse>> {
    let execution = state.dispatcher.execute(&name, arguments)?;
    Ok(Json(ExecutionResponse { execution }))
}

pub async fn list_executions(State(state): State<Arc<AppState>>) -> Json<ListExecutionsResponse> {
    let executions = state.dispatcher.list_executions();
    Json(ListExecutionsResponse {
        total: executions.len(),
        executions,
    })
}

pub async fn get_execution(
    State(state): State<Arc<AppState>>,
    Path(execution_id): Path<String>,
) -> ApiResult<Json<ExecutionResponse>> {
    let execution = state
        .dispatcher
        .find_execution(&ExecutionId::new(execution_id.clone()))
        .ok_or(RegistryError::NotFound(execution_id))?;

    Ok(Json(ExecutionResponse { execution }))
}

pub async fn tool_exists(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<ToolExistsResponse> {
    Json(ToolExistsResponse {
        exists: state.dispatcher.tool_exists(&name),
        tool_name: name,
    })
}

pub async fn tool_stats(State(state): State<Arc<AppState>>) -> Json<ToolStats> {
    Json(state.dispatcher.stats())
}

/// Describe the tools API
pub async fn tool_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let endpoints: BTreeMap<&str, &str> = BTreeMap::from([
        ("GET /api/tools", "List all tools"),
        ("POST /api/tools", "Create a tool"),
        ("PUT /api/tools/{name}", "Update a tool"),
        ("DELETE /api/tools/{name}", "Delete a tool"),
        ("GET /api/tools/{name}", "Find a tool by name"),
        ("GET /api/tools/by-capability", "Find tools by capability"),
        ("POST /api/tools/{name}/execute", "Execute a tool"),
        ("GET /api/tools/executions/{id}", "Find an execution by id"),
        ("GET /api/tools/executions", "List all executions"),
        ("GET /api/tools/exists/{name}", "Check whether a tool exists"),
        ("GET /api/tools/stats", "Tool statistics"),
        ("GET /api/tools/info", "API information"),
    ]);

    let available_tools: Vec<_> = state
        .dispatcher
        .list_tools()
        .into_iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "description": t.description,
                "capabilities": t.capabilities,
            })
        })
        .collect();

    Json(serde_json::json!({
        "api_version": "1.0",
        "description": format!("API for managing and executing {} tools", state.app.name),
        "application": {
            "name": state.app.name,
            "version": state.app.version,
            "company": state.app.company,
        },
        "endpoints": endpoints,
        "available_tools": available_tools,
    }))
}
