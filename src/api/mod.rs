//! HTTP surfaces over the registry: pro-facing context, admin content
//! CRUD, and the agent tool-calling API.

pub mod admin;
pub mod agent;
pub mod context;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::accounts::AccountStore;
use crate::config::RegistryConfig;
use crate::content::ContentStore;
use crate::error::ApiError;

/// Application state shared across handlers.
///
/// Both stores are constructed once at startup and passed in explicitly;
/// there is no module-level singleton. Mutations take the write lock,
/// persist, and release before responding.
#[derive(Clone)]
pub struct ApiState {
    pub content: Arc<RwLock<ContentStore>>,
    pub accounts: Arc<RwLock<AccountStore>>,
    pub config: RegistryConfig,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": format!("{entity} not found: {id}")})),
            )
                .into_response(),
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": message})),
            )
                .into_response(),
            ApiError::Storage(e) => {
                // Detail stays server-side; callers get a generic fault.
                tracing::error!(error = %e, "Storage fault while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "Internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pro-onboard"
    }))
}

/// Build the full registry router.
pub fn registry_routes(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(context::routes())
        .merge(admin::routes())
        .merge(agent::routes())
        .layer(cors)
        .with_state(state)
}
