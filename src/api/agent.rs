//! Agent (tool-caller) surface.
//!
//! Five endpoints matching the documented tool-calling contract, plus
//! the tool catalog itself. Responses carry a three-value `state` field
//! narrowed from the four-stage domain model through one mapping:
//! `engaged` reports as `activated`. Agents act on the activation
//! boundary; engagement is a post-activation intensity signal the
//! pro-facing and admin surfaces still expose in full.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use crate::accounts::ProAccount;
use crate::content::{ContentStore, ContextSnippet, OnboardingItem, Stage};
use crate::error::ApiError;
use crate::resolve::{
    ProgressSummary, StatusFieldSource, progress_summary, resolve_feature, weekly_next_steps,
};

use super::ApiState;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/agent/context/{pro_id}", get(get_onboarding_context))
        .route(
            "/api/agent/feature/{pro_id}/{feature_id}",
            get(get_feature_details),
        )
        .route("/api/agent/next-steps/{pro_id}", get(get_next_steps))
        .route("/api/agent/complete", post(complete_onboarding_step))
        .route("/api/agent/summary/{pro_id}", get(get_pro_summary))
        .route("/api/agent/tools", get(list_tools))
}

/// The narrowed stage enum agents consume.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    NotAttached,
    Attached,
    Activated,
}

impl From<Stage> for AgentState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::NotAttached => Self::NotAttached,
            Stage::Attached => Self::Attached,
            Stage::Activated | Stage::Engaged => Self::Activated,
        }
    }
}

/// One onboarding item joined with its stage assignment, as agents see it.
#[derive(Debug, Clone, Serialize)]
pub struct AgentItem {
    pub item_id: String,
    pub title: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub estimated_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// One feature in an agent context response.
#[derive(Debug, Clone, Serialize)]
pub struct AgentFeature {
    pub feature_id: String,
    pub feature_name: String,
    pub state: AgentState,
    pub pending: Vec<AgentItem>,
    pub completed: Vec<AgentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub context_snippets: Vec<ContextSnippet>,
    pub tools: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AgentContextResponse {
    pro_id: String,
    company_name: String,
    current_week: u8,
    progress: ProgressSummary,
    features: Vec<AgentFeature>,
}

fn agent_item(assignment: &crate::content::OnboardingItemAssignment, content: &ContentStore) -> AgentItem {
    let definition = content.find_item(&assignment.item_id);
    AgentItem {
        item_id: assignment.item_id.clone(),
        title: definition
            .map(|d| d.title.clone())
            .unwrap_or_else(|| assignment.item_id.clone()),
        required: assignment.required,
        note: assignment.note.clone(),
        estimated_minutes: definition.map(|d| d.estimated_minutes).unwrap_or(0),
        action_url: definition.and_then(|d| d.action_url.clone()),
    }
}

fn agent_feature(resolved: crate::resolve::ResolvedFeature, content: &ContentStore) -> AgentFeature {
    let (pending, completed, prompt, snippets, tools) = match resolved.context {
        Some(ctx) => (
            ctx.pending.iter().map(|a| agent_item(a, content)).collect(),
            ctx.completed
                .iter()
                .map(|a| agent_item(a, content))
                .collect(),
            ctx.prompt,
            ctx.context_snippets,
            ctx.tools,
        ),
        None => (Vec::new(), Vec::new(), None, Vec::new(), Vec::new()),
    };

    AgentFeature {
        feature_id: resolved.feature_id,
        feature_name: resolved.feature_name,
        state: resolved.stage.into(),
        pending,
        completed,
        prompt,
        context_snippets: snippets,
        tools,
    }
}

async fn find_pro(state: &ApiState, pro_id: &str) -> Result<ProAccount, ApiError> {
    let accounts = state.accounts.read().await;
    accounts
        .find(pro_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Pro", pro_id))
}

/// GET /api/agent/context/{pro_id} — `get_onboarding_context`.
async fn get_onboarding_context(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let pro = find_pro(&state, &pro_id).await?;
    let content = state.content.read().await;

    // Same inclusion rule as the pro-facing surface: features whose
    // stage context is defined, itemless or not.
    let features = content
        .all_features()
        .iter()
        .map(|f| resolve_feature(&pro, f, &StatusFieldSource))
        .filter(|r| r.context.is_some())
        .map(|r| agent_feature(r, &content))
        .collect();

    Ok(Json(AgentContextResponse {
        pro_id: pro.id.clone(),
        company_name: pro.company_name.clone(),
        current_week: pro.current_week,
        progress: progress_summary(&pro, content.all_items()),
        features,
    }))
}

/// GET /api/agent/feature/{pro_id}/{feature_id} — `get_feature_details`.
async fn get_feature_details(
    State(state): State<ApiState>,
    Path((pro_id, feature_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let pro = find_pro(&state, &pro_id).await?;
    let content = state.content.read().await;
    let feature = content
        .find_feature(&feature_id)
        .ok_or_else(|| ApiError::not_found("Feature", &feature_id))?;

    let resolved = resolve_feature(&pro, feature, &StatusFieldSource);
    Ok(Json(agent_feature(resolved, &content)))
}

#[derive(Debug, Deserialize)]
struct NextStepsQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct NextStepsResponse {
    pro_id: String,
    limit: usize,
    steps: Vec<OnboardingItem>,
}

/// GET /api/agent/next-steps/{pro_id} — `get_next_steps`.
///
/// Weekly-plan-aware: the pro's current-week plan items come before the
/// rest of the incomplete catalog.
async fn get_next_steps(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
    Query(query): Query<NextStepsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pro = find_pro(&state, &pro_id).await?;
    let content = state.content.read().await;
    let limit = query.limit.unwrap_or(state.config.agent_next_steps_limit);
    let steps = weekly_next_steps(&pro, content.all_items(), limit);

    Ok(Json(NextStepsResponse {
        pro_id: pro.id,
        limit,
        steps,
    }))
}

#[derive(Debug, Deserialize)]
struct CompleteStepRequest {
    #[serde(default)]
    pro_id: String,
    #[serde(default)]
    item_id: String,
}

/// POST /api/agent/complete — `complete_onboarding_step`.
///
/// Both ids are required and validated before any store access.
async fn complete_onboarding_step(
    State(state): State<ApiState>,
    Json(body): Json<CompleteStepRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.pro_id.is_empty() || body.item_id.is_empty() {
        return Err(ApiError::validation("pro_id and item_id are required"));
    }

    {
        let content = state.content.read().await;
        if content.find_item(&body.item_id).is_none() {
            return Err(ApiError::not_found("Item", &body.item_id));
        }
    }

    let mut accounts = state.accounts.write().await;
    let pro = accounts
        .complete_item(&body.pro_id, &body.item_id)?
        .ok_or_else(|| ApiError::not_found("Pro", &body.pro_id))?;

    Ok(Json(serde_json::json!({
        "status": "completed",
        "pro_id": pro.id,
        "item_id": body.item_id,
        "completed_items": pro.completed_items,
    })))
}

#[derive(Debug, Serialize)]
struct FeatureStateSummary {
    feature_id: String,
    state: AgentState,
    usage_count: u32,
}

#[derive(Debug, Serialize)]
struct ProSummaryResponse {
    pro_id: String,
    company_name: String,
    owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trade: Option<String>,
    current_week: u8,
    progress: ProgressSummary,
    features: Vec<FeatureStateSummary>,
}

/// GET /api/agent/summary/{pro_id} — `get_pro_summary`.
async fn get_pro_summary(
    State(state): State<ApiState>,
    Path(pro_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let pro = find_pro(&state, &pro_id).await?;
    let content = state.content.read().await;

    let features = content
        .all_features()
        .iter()
        .map(|f| {
            let status = pro.status_for(&f.id);
            FeatureStateSummary {
                feature_id: f.id.clone(),
                state: status.stage.into(),
                usage_count: status.usage_count,
            }
        })
        .collect();

    Ok(Json(ProSummaryResponse {
        pro_id: pro.id.clone(),
        company_name: pro.company_name.clone(),
        owner_name: pro.owner_name.clone(),
        trade: pro.trade.clone(),
        current_week: pro.current_week,
        progress: progress_summary(&pro, content.all_items()),
        features,
    }))
}

/// GET /api/agent/tools — the tool catalog callers wire into their
/// function-calling setup.
async fn list_tools(State(state): State<ApiState>) -> impl IntoResponse {
    let content = state.content.read().await;
    Json(content.all_tools().to_vec())
}
