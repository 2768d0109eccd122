//! Pro-facing context endpoints plus a thin CRUD set over pro records.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::accounts::{ProAccount, ProAccountPatch};
use crate::error::ApiError;
use crate::resolve::{
    ProgressSummary, ResolvedFeature, StatusFieldSource, next_steps, progress_summary, resolve_all,
    resolve_feature,
};

use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/context", get(get_default_context))
        .route("/api/context/{pro_id}", get(get_context))
        .route(
            "/api/context/{pro_id}/feature/{feature_id}",
            get(get_feature_context),
        )
        .route("/api/context/{pro_id}/complete", post(complete_item))
        .route("/api/context/{pro_id}/uncomplete", post(uncomplete_item))
        .route("/api/pros", get(list_pros).post(create_pro))
        .route(
            "/api/pros/{id}",
            get(get_pro).put(update_pro).delete(delete_pro),
        )
}

/// Full onboarding context for one pro.
#[derive(Debug, serde::Serialize)]
pub struct ProContextResponse {
    pub pro: ProAccount,
    pub features: Vec<ResolvedFeature>,
    pub next_steps: Vec<crate::content::OnboardingItem>,
    pub progress: ProgressSummary,
}

#[derive(Debug, Deserialize)]
struct ContextQuery {
    pro_id: Option<String>,
    limit: Option<usize>,
}

/// GET /api/context — read-only convenience form that falls back to the
/// configured demo pro when no id is supplied.
async fn get_default_context(
    State(state): State<ApiState>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<ProContextResponse>, ApiError> {
    let pro_id = query
        .pro_id
        .unwrap_or_else(|| state.config.default_pro_id.clone());
    build_context(&state, &pro_id, query.limit).await.map(Json)
}

/// GET /api/context/{pro_id}
async fn get_context(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<ProContextResponse>, ApiError> {
    build_context(&state, &pro_id, query.limit).await.map(Json)
}

async fn build_context(
    state: &ApiState,
    pro_id: &str,
    limit: Option<usize>,
) -> Result<ProContextResponse, ApiError> {
    let accounts = state.accounts.read().await;
    let pro = accounts
        .find(pro_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Pro", pro_id))?;
    drop(accounts);

    let content = state.content.read().await;
    let features = resolve_all(&pro, content.all_features(), &StatusFieldSource);
    let limit = limit.unwrap_or(state.config.ui_next_steps_limit);
    let steps = next_steps(&pro, content.all_items(), limit);
    let progress = progress_summary(&pro, content.all_items());

    Ok(ProContextResponse {
        pro,
        features,
        next_steps: steps,
        progress,
    })
}

/// GET /api/context/{pro_id}/feature/{feature_id}
async fn get_feature_context(
    State(state): State<ApiState>,
    Path((pro_id, feature_id)): Path<(String, String)>,
) -> Result<Json<ResolvedFeature>, ApiError> {
    let accounts = state.accounts.read().await;
    let pro = accounts
        .find(&pro_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Pro", &pro_id))?;
    drop(accounts);

    let content = state.content.read().await;
    let feature = content
        .find_feature(&feature_id)
        .ok_or_else(|| ApiError::not_found("Feature", &feature_id))?;

    Ok(Json(resolve_feature(&pro, feature, &StatusFieldSource)))
}

#[derive(Debug, Deserialize)]
struct ItemRequest {
    #[serde(default)]
    item_id: String,
}

/// POST /api/context/{pro_id}/complete
async fn complete_item(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
    Json(body): Json<ItemRequest>,
) -> Result<Json<ProAccount>, ApiError> {
    if body.item_id.is_empty() {
        return Err(ApiError::validation("item_id is required"));
    }

    {
        let content = state.content.read().await;
        if content.find_item(&body.item_id).is_none() {
            return Err(ApiError::not_found("Item", &body.item_id));
        }
    }

    let mut accounts = state.accounts.write().await;
    let pro = accounts
        .complete_item(&pro_id, &body.item_id)?
        .ok_or_else(|| ApiError::not_found("Pro", &pro_id))?;
    Ok(Json(pro))
}

/// POST /api/context/{pro_id}/uncomplete
async fn uncomplete_item(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
    Json(body): Json<ItemRequest>,
) -> Result<Json<ProAccount>, ApiError> {
    if body.item_id.is_empty() {
        return Err(ApiError::validation("item_id is required"));
    }

    let mut accounts = state.accounts.write().await;
    let pro = accounts
        .uncomplete_item(&pro_id, &body.item_id)?
        .ok_or_else(|| ApiError::not_found("Pro", &pro_id))?;
    Ok(Json(pro))
}

// ── Pro CRUD ────────────────────────────────────────────────────────────

async fn list_pros(State(state): State<ApiState>) -> impl IntoResponse {
    let accounts = state.accounts.read().await;
    Json(accounts.all().to_vec())
}

async fn get_pro(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ProAccount>, ApiError> {
    let accounts = state.accounts.read().await;
    accounts
        .find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Pro", &id))
}

async fn create_pro(
    State(state): State<ApiState>,
    Json(pro): Json<ProAccount>,
) -> Result<(StatusCode, Json<ProAccount>), ApiError> {
    if pro.id.is_empty() {
        return Err(ApiError::validation("id is required"));
    }
    let mut accounts = state.accounts.write().await;
    let created = accounts.create(pro)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_pro(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<ProAccountPatch>,
) -> Result<Json<ProAccount>, ApiError> {
    let mut accounts = state.accounts.write().await;
    accounts
        .update(&id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Pro", &id))
}

async fn delete_pro(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut accounts = state.accounts.write().await;
    if accounts.delete(&id)? {
        Ok(Json(serde_json::json!({"status": "deleted"})))
    } else {
        Err(ApiError::not_found("Pro", &id))
    }
}
