//! Administrative CRUD over the content store.
//!
//! Pure content management — no stage resolution here. Upserts are
//! keyed by id (or the fallback label slug for navigation and calendly
//! entries), persist immediately, and deleting an absent entity is 404.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};

use crate::content::{
    CalendlyLink, CompletionStep, Feature, McpToolDef, NavigationItem, OnboardingItem,
};
use crate::error::ApiError;

use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/api/admin/features",
            get(list_features).post(upsert_feature),
        )
        .route(
            "/api/admin/features/{id}",
            get(get_feature).put(put_feature).delete(delete_feature),
        )
        .route("/api/admin/items", get(list_items).post(upsert_item))
        .route(
            "/api/admin/items/{id}",
            get(get_item).put(put_item).delete(delete_item),
        )
        .route(
            "/api/admin/completion-steps",
            get(list_steps).post(upsert_step),
        )
        .route(
            "/api/admin/completion-steps/{id}",
            get(get_step).put(put_step).delete(delete_step),
        )
        .route(
            "/api/admin/navigation",
            get(list_navigation).post(upsert_navigation),
        )
        .route(
            "/api/admin/navigation/{key}",
            get(get_navigation).delete(delete_navigation),
        )
        .route(
            "/api/admin/calendly-links",
            get(list_calendly).post(upsert_calendly),
        )
        .route(
            "/api/admin/calendly-links/{key}",
            get(get_calendly).delete(delete_calendly),
        )
        .route("/api/admin/tools", get(list_tools).post(upsert_tool))
        .route(
            "/api/admin/tools/{name}",
            get(get_tool).put(put_tool).delete(delete_tool),
        )
        .route("/api/admin/reload", post(reload))
}

/// POST /api/admin/reload — pick up out-of-band file edits.
async fn reload(State(state): State<ApiState>) -> impl IntoResponse {
    let mut content = state.content.write().await;
    content.reload();
    Json(serde_json::json!({
        "status": "reloaded",
        "features": content.all_features().len(),
        "items": content.all_items().len(),
    }))
}

// ── Features ────────────────────────────────────────────────────────────

async fn list_features(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_features().to_vec())
}

async fn get_feature(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Feature>, ApiError> {
    let content = state.content.read().await;
    content
        .find_feature(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Feature", &id))
}

async fn upsert_feature(
    State(state): State<ApiState>,
    Json(feature): Json<Feature>,
) -> Result<Json<Feature>, ApiError> {
    if feature.id.is_empty() {
        return Err(ApiError::validation("id is required"));
    }
    let mut content = state.content.write().await;
    content.set_feature(feature.clone())?;
    Ok(Json(feature))
}

async fn put_feature(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(feature): Json<Feature>,
) -> Result<Json<Feature>, ApiError> {
    if feature.id != id {
        return Err(ApiError::validation("body id does not match path id"));
    }
    let mut content = state.content.write().await;
    content.set_feature(feature.clone())?;
    Ok(Json(feature))
}

async fn delete_feature(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_feature(&id)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Feature", &id))
    }
}

// ── Onboarding items ────────────────────────────────────────────────────

async fn list_items(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_items().to_vec())
}

async fn get_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<OnboardingItem>, ApiError> {
    let content = state.content.read().await;
    content
        .find_item(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item", &id))
}

async fn upsert_item(
    State(state): State<ApiState>,
    Json(item): Json<OnboardingItem>,
) -> Result<Json<OnboardingItem>, ApiError> {
    if item.id.is_empty() {
        return Err(ApiError::validation("id is required"));
    }
    let mut content = state.content.write().await;
    content.set_item(item.clone())?;
    Ok(Json(item))
}

async fn put_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(item): Json<OnboardingItem>,
) -> Result<Json<OnboardingItem>, ApiError> {
    if item.id != id {
        return Err(ApiError::validation("body id does not match path id"));
    }
    let mut content = state.content.write().await;
    content.set_item(item.clone())?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_item(&id)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Item", &id))
    }
}

// ── Completion steps ────────────────────────────────────────────────────

async fn list_steps(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_completion_steps().to_vec())
}

async fn get_step(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<CompletionStep>, ApiError> {
    let content = state.content.read().await;
    content
        .find_completion_step(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Completion step", &id))
}

async fn upsert_step(
    State(state): State<ApiState>,
    Json(step): Json<CompletionStep>,
) -> Result<Json<CompletionStep>, ApiError> {
    if step.id.is_empty() {
        return Err(ApiError::validation("id is required"));
    }
    let mut content = state.content.write().await;
    content.set_completion_step(step.clone())?;
    Ok(Json(step))
}

async fn put_step(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(step): Json<CompletionStep>,
) -> Result<Json<CompletionStep>, ApiError> {
    if step.id != id {
        return Err(ApiError::validation("body id does not match path id"));
    }
    let mut content = state.content.write().await;
    content.set_completion_step(step.clone())?;
    Ok(Json(step))
}

async fn delete_step(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_completion_step(&id)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Completion step", &id))
    }
}

// ── Navigation ──────────────────────────────────────────────────────────

async fn list_navigation(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_navigation().to_vec())
}

async fn get_navigation(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<NavigationItem>, ApiError> {
    let content = state.content.read().await;
    content
        .find_navigation(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Navigation item", &key))
}

async fn upsert_navigation(
    State(state): State<ApiState>,
    Json(nav): Json<NavigationItem>,
) -> Result<Json<NavigationItem>, ApiError> {
    if nav.label.is_empty() {
        return Err(ApiError::validation("label is required"));
    }
    let mut content = state.content.write().await;
    content.set_navigation(nav.clone())?;
    Ok(Json(nav))
}

async fn delete_navigation(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_navigation(&key)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Navigation item", &key))
    }
}

// ── Calendly links ──────────────────────────────────────────────────────

async fn list_calendly(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_calendly().to_vec())
}

async fn get_calendly(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<CalendlyLink>, ApiError> {
    let content = state.content.read().await;
    content
        .find_calendly(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Calendly link", &key))
}

async fn upsert_calendly(
    State(state): State<ApiState>,
    Json(link): Json<CalendlyLink>,
) -> Result<Json<CalendlyLink>, ApiError> {
    if link.label.is_empty() {
        return Err(ApiError::validation("label is required"));
    }
    let mut content = state.content.write().await;
    content.set_calendly(link.clone())?;
    Ok(Json(link))
}

async fn delete_calendly(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_calendly(&key)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Calendly link", &key))
    }
}

// ── Agent tools ─────────────────────────────────────────────────────────

async fn list_tools(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_tools().to_vec())
}

async fn get_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<McpToolDef>, ApiError> {
    let content = state.content.read().await;
    content
        .find_tool(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tool", &name))
}

async fn upsert_tool(
    State(state): State<ApiState>,
    Json(tool): Json<McpToolDef>,
) -> Result<Json<McpToolDef>, ApiError> {
    if tool.name.is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    let mut content = state.content.write().await;
    content.set_tool(tool.clone())?;
    Ok(Json(tool))
}

async fn put_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(tool): Json<McpToolDef>,
) -> Result<Json<McpToolDef>, ApiError> {
    if tool.name != name {
        return Err(ApiError::validation("body name does not match path name"));
    }
    let mut content = state.content.write().await;
    content.set_tool(tool.clone())?;
    Ok(Json(tool))
}

async fn delete_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut content = state.content.write().await;
    if content.delete_tool(&name)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Tool", &name))
    }
}
