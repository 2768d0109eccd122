//! Integration tests for the registry's HTTP surfaces.
//!
//! Each test seeds a fresh tempdir with YAML fixtures, builds the real
//! router, and exercises the HTTP contract end to end.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use pro_onboard::accounts::AccountStore;
use pro_onboard::api::{ApiState, registry_routes};
use pro_onboard::config::RegistryConfig;
use pro_onboard::content::ContentStore;

const INVOICING_FEATURE: &str = r#"
id: invoicing
name: Invoicing
version: 1.0.0
status: published
stages:
  attached:
    onboarding_items:
      - item_id: create-first-customer
        required: true
      - item_id: create-first-job
        required: true
      - item_id: complete-first-job
        required: true
    prompt: "Help the pro send their first invoice."
    tools:
      - get_next_steps
"#;

const SCHEDULING_FEATURE: &str = r#"
id: scheduling
name: Scheduling
version: 0.2.0
stages:
  notAttached:
    prompt: "Introduce scheduling."
"#;

const REPORTS_FEATURE: &str = r#"
id: reports
name: Reports
version: 1.1.0
stages:
  activated:
    onboarding_items:
      - item_id: review-weekly-report
        required: false
"#;

const ITEMS: &str = r#"
- id: create-first-customer
  title: Create your first customer
  item_type: in_product
  estimated_minutes: 5
- id: create-first-job
  title: Create your first job
  item_type: in_product
  estimated_minutes: 10
- id: complete-first-job
  title: Complete your first job
  item_type: in_product
  estimated_minutes: 15
- id: send-first-invoice
  title: Send your first invoice
  item_type: in_product
  estimated_minutes: 10
- id: collect-first-payment
  title: Collect your first payment
  item_type: rep_facing
  instructions: Walk the pro through payment collection.
  estimated_minutes: 20
"#;

const PROS: &str = r#"
- id: pro-001
  company_name: Acme Plumbing
  owner_name: Jo
  current_week: 1
  feature_status:
    invoicing:
      stage: attached
      completed_tasks:
        - create-first-customer
- id: pro-002
  company_name: Beta Electric
  current_week: 1
  weekly_plan:
    week1:
      - item_id: collect-first-payment
        order: 1
    week2: []
    week3: []
    week4: []
  feature_status:
    reports:
      stage: engaged
      usage_count: 42
"#;

fn seed(dir: &std::path::Path) {
    let features = dir.join("features");
    std::fs::create_dir_all(&features).unwrap();
    std::fs::write(features.join("invoicing.yaml"), INVOICING_FEATURE).unwrap();
    std::fs::write(features.join("scheduling.yaml"), SCHEDULING_FEATURE).unwrap();
    std::fs::write(features.join("reports.yaml"), REPORTS_FEATURE).unwrap();
    std::fs::write(dir.join("onboarding_items.yaml"), ITEMS).unwrap();
    std::fs::write(dir.join("pros.yaml"), PROS).unwrap();
}

fn app(dir: &std::path::Path) -> Router {
    seed(dir);
    let content = ContentStore::load(dir);
    let accounts = AccountStore::load(dir, content.feature_ids());
    registry_routes(ApiState {
        content: Arc::new(RwLock::new(content)),
        accounts: Arc::new(RwLock::new(accounts)),
        config: RegistryConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        },
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn item_ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|a| a["item_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn unknown_pro_is_404_with_no_partial_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/context/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
    assert!(body.get("features").is_none());
}

#[tokio::test]
async fn attached_feature_partitions_pending_and_completed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/context/pro-001/feature/invoicing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "attached");
    assert_eq!(
        item_ids(&body["context"]["pending"]),
        vec!["create-first-job", "complete-first-job"]
    );
    assert_eq!(
        item_ids(&body["context"]["completed"]),
        vec!["create-first-customer"]
    );
}

#[tokio::test]
async fn completing_an_item_shrinks_pending_on_refetch() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, _) = post(
        &app,
        "/api/context/pro-001/complete",
        serde_json::json!({"item_id": "create-first-job"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/context/pro-001/feature/invoicing").await;
    assert_eq!(
        item_ids(&body["context"]["pending"]),
        vec!["complete-first-job"]
    );
}

#[tokio::test]
async fn complete_is_idempotent_and_uncomplete_of_absent_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    for _ in 0..2 {
        let (status, _) = post(
            &app,
            "/api/context/pro-001/complete",
            serde_json::json!({"item_id": "send-first-invoice"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, pro) = get(&app, "/api/pros/pro-001").await;
    let completed: Vec<&str> = pro["completed_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        completed
            .iter()
            .filter(|id| **id == "send-first-invoice")
            .count(),
        1
    );

    let (status, _) = post(
        &app,
        "/api/context/pro-001/uncomplete",
        serde_json::json!({"item_id": "never-completed"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn full_context_includes_resolved_features_and_next_steps() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/context/pro-001").await;
    assert_eq!(status, StatusCode::OK);

    // invoicing (attached defined) and scheduling (notAttached defined,
    // itemless) are included; reports defines no notAttached context.
    let ids: Vec<&str> = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["feature_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["invoicing", "scheduling"]);

    // UI default limit is 3, and completed items are excluded.
    let steps: Vec<&str> = body["next_steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        steps,
        vec!["create-first-customer", "create-first-job", "complete-first-job"]
    );
}

#[tokio::test]
async fn default_pro_is_used_when_context_id_omitted() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/context").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pro"]["id"], "pro-001");
}

#[tokio::test]
async fn agent_next_steps_float_weekly_plan_matches_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    // pro-002: 1 weekly-matching incomplete item, 4 other incomplete.
    let (status, body) = get(&app, "/api/agent/next-steps/pro-002?limit=2").await;
    assert_eq!(status, StatusCode::OK);

    let steps: Vec<&str> = body["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(steps, vec!["collect-first-payment", "create-first-customer"]);
}

#[tokio::test]
async fn agent_complete_rejects_missing_fields_before_store_access() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = post(
        &app,
        "/api/agent/complete",
        serde_json::json!({"pro_id": "pro-001"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("item_id"));
}

#[tokio::test]
async fn agent_summary_narrows_engaged_to_activated() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/agent/summary/pro-002").await;
    assert_eq!(status, StatusCode::OK);

    let reports = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["feature_id"] == "reports")
        .unwrap();
    assert_eq!(reports["state"], "activated");
    assert_eq!(reports["usage_count"], 42);

    // Backfilled features report not_attached.
    let invoicing = body["features"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["feature_id"] == "invoicing")
        .unwrap();
    assert_eq!(invoicing["state"], "not_attached");
}

#[tokio::test]
async fn agent_context_states_stay_within_three_values() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/agent/context/pro-002").await;
    assert_eq!(status, StatusCode::OK);
    for feature in body["features"].as_array().unwrap() {
        let state = feature["state"].as_str().unwrap();
        assert!(
            ["not_attached", "attached", "activated"].contains(&state),
            "unexpected agent state {state}"
        );
    }
}

#[tokio::test]
async fn admin_delete_of_absent_item_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/items/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_feature_upsert_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, _) = post(
        &app,
        "/api/admin/features",
        serde_json::json!({
            "id": "estimates",
            "name": "Estimates",
            "stages": {
                "notAttached": {"prompt": "Pitch estimates."}
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("features/estimates.yaml").exists());

    let (status, body) = get(&app, "/api/admin/features/estimates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Estimates");
}

#[tokio::test]
async fn admin_reload_picks_up_out_of_band_edits() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    std::fs::write(
        dir.path().join("features/new-feature.yaml"),
        "id: new-feature\nname: New Feature\n",
    )
    .unwrap();

    let (_, before) = get(&app, "/api/admin/features/new-feature").await;
    assert!(before["error"].is_string());

    let (status, _) = post(&app, "/api/admin/reload", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/admin/features/new-feature").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn agent_feature_details_join_item_definitions() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = get(&app, "/api/agent/feature/pro-001/invoicing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "attached");

    let pending = body["pending"].as_array().unwrap();
    assert_eq!(pending[0]["item_id"], "create-first-job");
    assert_eq!(pending[0]["title"], "Create your first job");
    assert_eq!(pending[0]["estimated_minutes"], 10);
}
