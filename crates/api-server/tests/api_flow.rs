//! End-to-end REST flow over an in-memory store: import users, define
//! segments, query members, export, and analyze.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use segment_analysis::{AnalysisOutput, AnalysisRequest, SegmentAnalyzer};
use segment_api::{router, AppState};
use segment_core::{SegmentResult, User};
use segment_csv::ImportSchema;
use segment_engine::SegmentStore;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceExt;

const USERS_CSV: &str = "id,name,email,lastSeen,postCount,location,isPro\n\
1,Ada,ada@example.com,2024-04-01,45,London,true\n\
2,Grace,grace@example.com,2024-06-10,12,New York,false\n\
3,Linus,linus@example.com,2024-06-01,31,London,true\n";

struct EchoAnalyzer;

#[async_trait]
impl SegmentAnalyzer for EchoAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> SegmentResult<AnalysisOutput> {
        let sample: Vec<User> = serde_json::from_str(&request.sample_users)?;
        Ok(AnalysisOutput {
            analysis: format!("{}: {} sampled", request.segment_name, sample.len()),
        })
    }
}

fn app(analyzer: Option<Arc<dyn SegmentAnalyzer>>) -> (Router, Arc<SegmentStore>) {
    let store = Arc::new(SegmentStore::new());
    store.seed_demo_segments();
    let state = AppState {
        store: store.clone(),
        schema: Arc::new(ImportSchema::default()),
        analyzer,
        sample_size: 20,
        node_id: "test-node".to_string(),
        start_time: Instant::now(),
    };
    (router(state), store)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec(), disposition)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn import(app: &Router) {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/users/import")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(USERS_CSV))
        .unwrap();
    let (status, body, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["imported"], 3);
}

#[tokio::test]
async fn test_import_then_demo_membership() {
    let (app, store) = app(None);
    import(&app).await;
    assert_eq!(store.user_count(), 3);

    let (status, body, _) = send(&app, get("/v1/segments/1/members")).await;
    assert_eq!(status, StatusCode::OK);
    let members: Vec<User> = serde_json::from_slice(&body).unwrap();
    let names: Vec<String> = members
        .iter()
        .filter_map(|u| u.get("name").map(|v| v.to_string()))
        .collect();
    assert_eq!(names, vec!["Ada", "Linus"]);

    let (_, body, _) = send(&app, get("/v1/segments")).await;
    let list: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(list[0]["member_count"], 2);
    assert_eq!(list[1]["member_count"], 1);
    assert_eq!(list[2]["member_count"], 1);
}

#[tokio::test]
async fn test_create_update_delete() {
    let (app, _) = app(None);
    import(&app).await;

    let body = serde_json::json!({
        "name": "Londoners",
        "rules": [{"id": "r1", "field": "location", "operator": "contains", "value": "lond"}]
    });
    let (status, body, _) = send(&app, post_json("/v1/segments", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let (_, body, _) = send(&app, get(&format!("/v1/segments/{id}/members"))).await;
    let members: Vec<User> = serde_json::from_slice(&body).unwrap();
    assert_eq!(members.len(), 2);

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/v1/segments/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Busy Londoners",
                "rules": [
                    {"id": "r1", "field": "location", "operator": "contains", "value": "lond"},
                    {"id": "r2", "field": "postCount", "operator": ">", "value": "40"}
                ]
            })
            .to_string(),
        ))
        .unwrap();
    let (status, _, _) = send(&app, update).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body, _) = send(&app, get(&format!("/v1/segments/{id}/members"))).await;
    let members: Vec<User> = serde_json::from_slice(&body).unwrap();
    assert_eq!(members.len(), 1);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/segments/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, get(&format!("/v1/segments/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_segment_without_rules_rejected() {
    let (app, _) = app(None);
    let body = serde_json::json!({"name": "Everyone", "rules": []});
    let (status, body, _) = send(&app, post_json("/v1/segments", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "invalid_segment");
}

#[tokio::test]
async fn test_export_csv() {
    let (app, _) = app(None);

    let (status, _, _) = send(&app, get("/v1/segments/2/export")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    import(&app).await;
    let (status, body, disposition) = send(&app, get("/v1/segments/2/export")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        disposition.as_deref(),
        Some("attachment; filename=\"new_yorkers_users.csv\"")
    );
    let csv = String::from_utf8(body).unwrap();
    assert_eq!(
        csv,
        "id,name,email,lastSeen,postCount,location,isPro\n\
         2,Grace,grace@example.com,2024-06-10,12,New York,false"
    );
}

#[tokio::test]
async fn test_bad_csv_rejected() {
    let (app, store) = app(None);
    let request = Request::builder()
        .method("POST")
        .uri("/v1/users/import")
        .body(Body::from("id,name\n1,\"Ada\n"))
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.user_count(), 0);
}

#[tokio::test]
async fn test_analysis() {
    let (disabled, _) = app(None);
    let (status, _, _) = send(&disabled, post_json("/v1/segments/1/analyze", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (app, _) = app(Some(Arc::new(EchoAnalyzer)));
    import(&app).await;
    let (status, body, _) = send(&app, post_json("/v1/segments/1/analyze", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let output: AnalysisOutput = serde_json::from_slice(&body).unwrap();
    assert_eq!(output.analysis, "Power Users: 2 sampled");

    let (status, _, _) = send(&app, post_json("/v1/segments/nope/analyze", serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_and_health() {
    let (app, _) = app(None);
    let (status, body, _) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/v1/segments/{id}/members"].is_object());

    let (status, body, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["segments"], 3);
}
