use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::backend::BackendClient;
use crate::config::PanelConfig;
use crate::services::notification_service::NotificationService;
use crate::services::simulation_service::SimulationService;
use crate::services::stats_service::StatsService;
use crate::storage::MemoryStore;
use crate::{build_router, AppState};

fn test_config(admin_token: &str) -> PanelConfig {
    PanelConfig {
        listen_port: 0,
        // nothing listens here; handlers must degrade gracefully
        backend_url: "http://127.0.0.1:9".to_string(),
        backend_token: String::new(),
        admin_path: "/admin".to_string(),
        admin_token: admin_token.to_string(),
        data_dir: ".".to_string(),
        ephemeral: true,
    }
}

fn test_state(admin_token: &str) -> AppState {
    let config = test_config(admin_token);
    let backend = BackendClient::new(config.backend_url.clone(), config.backend_token.clone());
    let simulation = Arc::new(SimulationService::with_tick_period(
        Arc::new(MemoryStore::new()),
        Duration::from_millis(50),
    ));
    let stats = Arc::new(StatsService::new(backend.clone(), simulation.clone()));
    let notifications = Arc::new(NotificationService::new(backend.clone()));

    let mut sys = sysinfo::System::new_all();
    sys.refresh_all();

    AppState {
        config,
        backend,
        simulation,
        stats,
        notifications,
        system_stats: Arc::new(tokio::sync::Mutex::new(sys)),
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap()
}

fn authed_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_router(test_state("secret"));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn admin_routes_require_token() {
    let app = build_router(test_state("secret"));

    let response = app
        .clone()
        .oneshot(get("/admin/api/simulation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri("/admin/api/simulation")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(authed_get("/admin/api/simulation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_admin_token_leaves_panel_open() {
    let app = build_router(test_state(""));

    let response = app.oneshot(get("/admin/api/simulation")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn toggle_online_via_api() {
    let state = test_state("secret");
    let app = build_router(state.clone());

    let response = app
        .clone()
        .oneshot(authed_post("/admin/api/simulation/online/toggle"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["active"], true);
    assert!(state.simulation.online_generator_running());

    let response = app
        .clone()
        .oneshot(authed_get("/admin/api/simulation"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["online_active"], true);

    let response = app
        .oneshot(authed_post("/admin/api/simulation/online/toggle"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["active"], false);
    assert!(!state.simulation.online_generator_running());
}

#[tokio::test]
async fn set_total_clamps_via_api() {
    let app = build_router(test_state("secret"));

    let request = Request::builder()
        .method("POST")
        .uri("/admin/api/simulation/total/set")
        .header(header::AUTHORIZATION, "Bearer secret")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"value":5000}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total_fake"], 1000);
}

#[tokio::test]
async fn admin_name_header_is_recorded_in_history() {
    let app = build_router(test_state("secret"));

    let request = Request::builder()
        .method("POST")
        .uri("/admin/api/simulation/total/increment")
        .header(header::AUTHORIZATION, "Bearer secret")
        .header("x-admin-name", "olga")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap();

    let response = app
        .oneshot(authed_get("/admin/api/simulation/history"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body[0]["admin"], "olga");
    assert_eq!(body[0]["action"], "Total offset incremented");
}

#[tokio::test]
async fn summary_combines_fake_totals() {
    let state = test_state("secret");
    let app = build_router(state.clone());

    // real counts are 0 (backend is down); enable the total simulation at 500
    let request = Request::builder()
        .method("POST")
        .uri("/admin/api/simulation/total/set")
        .header(header::AUTHORIZATION, "Bearer secret")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"value":500}"#))
        .unwrap();
    app.clone().oneshot(request).await.unwrap();
    app.clone()
        .oneshot(authed_post("/admin/api/simulation/total/toggle"))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/stats/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 500);
    assert_eq!(body["online"], 0);
}

#[tokio::test]
async fn reset_via_api_leaves_single_history_record() {
    let app = build_router(test_state("secret"));

    app.clone()
        .oneshot(authed_post("/admin/api/simulation/total/increment"))
        .await
        .unwrap();
    app.clone()
        .oneshot(authed_post("/admin/api/simulation/online/toggle"))
        .await
        .unwrap();

    let response = app
        .oneshot(authed_post("/admin/api/simulation/reset"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total_fake"], 207);
    assert_eq!(body["online_active"], false);
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn dashboard_degrades_without_backend() {
    let app = build_router(test_state("secret"));

    let response = app.oneshot(authed_get("/admin/api/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["backend_online"], false);
    assert_eq!(body["online_real"], 0);
    assert_eq!(body["total_real"], 0);
}

#[tokio::test]
async fn content_stats_surface_backend_failure() {
    let app = build_router(test_state("secret"));

    let response = app
        .oneshot(authed_get("/admin/api/stats/content"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}
