use crate::config::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Full white-label description of the application
pub async fn branding_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let app = &state.app;
    Json(json!({
        "application": {
            "name": app.name,
            "description": app.description,
            "version": app.version,
            "author": app.author,
            "company": app.company,
            "website": app.website,
            "copyright": app.copyright,
        },
        "support": {
            "email": app.support.email,
            "phone": app.support.phone,
        },
        "branding": {
            "logo_url": app.logo_url,
            "primary_color": app.theme.primary_color,
            "secondary_color": app.theme.secondary_color,
        },
        "legal": {
            "terms_url": app.terms_url,
            "privacy_url": app.privacy_url,
        },
        "timestamp": chrono::Utc::now(),
        "status": "success",
    }))
}

pub async fn theme_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let app = &state.app;
    Json(json!({
        "theme": {
            "primary_color": app.theme.primary_color,
            "secondary_color": app.theme.secondary_color,
            "logo_url": app.logo_url,
        },
        "company": {
            "name": app.company,
            "website": app.website,
        },
        "status": "success",
    }))
}

pub async fn contact_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    let app = &state.app;
    Json(json!({
        "company": app.company,
        "website": app.website,
        "support": {
            "email": app.support.email,
            "phone": app.support.phone,
        },
        "legal": {
            "terms_url": app.terms_url,
            "privacy_url": app.privacy_url,
            "copyright": app.copyright,
        },
        "status": "success",
    }))
}
