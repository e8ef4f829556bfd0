use super::ApiResult;
use crate::config::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use toolhub_core::{RegistryError, Resource, ResourcePatch, ResourceStats};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    pub resources: Vec<Resource>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceExistsResponse {
    pub uri: String,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResourceResponse {
    pub uri: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UriQuery {
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub struct MimeTypeQuery {
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

fn listing(resources: Vec<Resource>) -> Json<ListResourcesResponse> {
    Json(ListResourcesResponse {
        total: resources.len(),
        resources,
    })
}

pub async fn list_resources(State(state): State<Arc<AppState>>) -> Json<ListResourcesResponse> {
    listing(state.resources.list())
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource = state
        .resources
        .get(&query.uri)
        .ok_or(RegistryError::NotFound(query.uri))?;

    Ok(Json(ResourceResponse {
        resource,
        message: None,
    }))
}

pub async fn resources_by_mime_type(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MimeTypeQuery>,
) -> Json<ListResourcesResponse> {
    listing(state.resources.by_mime_type(&query.mime_type))
}

/// Case-insensitive search on resource names
pub async fn search_resources(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<ListResourcesResponse> {
    listing(state.resources.search_by_name(&query.name))
}

pub async fn resource_exists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UriQuery>,
) -> Json<ResourceExistsResponse> {
    Json(ResourceExistsResponse {
        exists: state.resources.exists(&query.uri),
        uri: query.uri,
    })
}

pub async fn resource_stats(State(state): State<Arc<AppState>>) -> Json<ResourceStats> {
    Json(state.resources.stats())
}

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    Json(resource): Json<Resource>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource = state.resources.create(resource)?;
    Ok(Json(ResourceResponse {
        resource,
        message: Some("Resource created".to_string()),
    }))
}

pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    Path(uri): Path<String>,
    Json(patch): Json<ResourcePatch>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource = state.resources.update(&uri, patch)?;
    Ok(Json(ResourceResponse {
        resource,
        message: Some("Resource updated".to_string()),
    }))
}

pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    Path(uri): Path<String>,
) -> ApiResult<Json<DeleteResourceResponse>> {
    if !state.resources.delete(&uri) {
        return Err(RegistryError::NotFound(uri).into());
    }
    Ok(Json(DeleteResourceResponse {
        uri,
        message: "Resource deleted".to_string(),
    }))
}

/// Describe the resources API
pub async fn resource_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let endpoints: BTreeMap<&str, &str> = BTreeMap::from([
        ("GET /api/resources", "List all resources"),
        ("POST /api/resources", "Create a resource"),
        ("PUT /api/resources/{uri}", "Update a resource"),
        ("DELETE /api/resources/{uri}", "Delete a resource"),
        ("GET /api/resources/by-uri", "Find a resource by URI"),
        ("GET /api/resources/by-mime-type", "Find resources by MIME type"),
        ("GET /api/resources/search", "Search resources by name"),
        ("GET /api/resources/exists", "Check whether a resource exists"),
        ("GET /api/resources/stats", "Resource statistics"),
        ("GET /api/resources/info", "API information"),
    ]);

    Json(serde_json::json!({
        "api_name": "Resources API",
        "version": "1.0.0",
        "description": format!("API for managing {} resources", state.app.name),
        "endpoints": endpoints,
        "white_label": {
            "application_name": state.app.name,
            "company_name": state.app.company,
            "support_email": state.app.support.email,
        },
    }))
}
