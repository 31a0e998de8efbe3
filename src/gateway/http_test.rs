use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::{Value, json};

use super::*;
use crate::config::Timeouts;
use crate::error::ErrorCode;
use crate::gateway::TaskId;

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_response_success() {
    let stats: UserStats = parse_response(200, r#"{"coins": 15, "completed_tasks": 2}"#).unwrap();
    assert_eq!(stats.coins, 15);
    assert_eq!(stats.completed_tasks, Some(2));
}

#[test]
fn parse_response_unauthorized() {
    let err = parse_response::<UserStats>(401, "").unwrap_err();
    assert!(matches!(err, GatewayError::Unauthorized));
}

#[test]
fn parse_response_error_status_keeps_body() {
    let err = parse_response::<Task>(500, "boom").unwrap_err();
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn parse_response_bad_json() {
    let err = parse_response::<Task>(200, "<html>").unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[test]
fn new_trims_trailing_slash() {
    let settings = GatewaySettings { base_url: "http://localhost:5000/".into(), ..GatewaySettings::default() };
    let backend = HttpBackend::new(&settings).unwrap();
    assert_eq!(backend.base_url(), "http://localhost:5000");
    assert_eq!(backend.url(TASK_PATH), "http://localhost:5000/api/get_task");
}

// =============================================================================
// Mock server
// =============================================================================

async fn serve(router: Router) -> HttpBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let settings = GatewaySettings {
        base_url: format!("http://{addr}"),
        timeouts: Timeouts { request_secs: 5, connect_secs: 5 },
    };
    HttpBackend::new(&settings).unwrap()
}

async fn echo_validate(Json(body): Json<Value>) -> Json<Value> {
    let count = body["shapes"].as_array().map_or(0, Vec::len);
    let first_is_circle = body["shapes"][0]["type"] == "circle";
    Json(json!({
        "valid": count == 1 && first_is_circle,
        "message": format!("task {} got {count} shapes.", body["task_id"]),
        "award": 5,
    }))
}

fn backend_router() -> Router {
    Router::new()
        .route(
            "/api/get_task",
            get(|| async {
                Json(json!({
                    "id": 4,
                    "name": "Red ball",
                    "description": "Place one red circle",
                    "target_shapes": [{"type": "circle", "color": "#FF0000"}],
                }))
            }),
        )
        .route("/api/user_stats", get(|| async { Json(json!({"coins": 120})) }))
        .route("/api/validate_shape", post(echo_validate))
}

#[tokio::test]
async fn fetch_task_over_http() {
    let backend = serve(backend_router()).await;
    let task = backend.fetch_task().await.unwrap();
    assert_eq!(task.id, TaskId::Number(4));
    assert_eq!(task.name, "Red ball");
    assert_eq!(task.target_shapes.len(), 1);
}

#[tokio::test]
async fn fetch_user_stats_over_http() {
    let backend = serve(backend_router()).await;
    let stats = backend.fetch_user_stats().await.unwrap();
    assert_eq!(stats.coins, 120);
    assert!(stats.total_tasks.is_none());
}

#[tokio::test]
async fn validate_posts_shapes() {
    let backend = serve(backend_router()).await;
    let request: ValidateRequest = serde_json::from_value(json!({
        "task_id": 4,
        "shapes": [{
            "type": "circle",
            "color": "#FF0000",
            "position": "50% 50%",
            "size": "60px",
            "rotation": "0deg",
        }],
    }))
    .unwrap();
    let response = backend.validate(&request).await.unwrap();
    assert!(response.valid);
    assert_eq!(response.message, "task 4 got 1 shapes.");
    assert_eq!(response.award, Some(5));
}

#[tokio::test]
async fn unauthorized_route_maps_to_unauthorized() {
    let router = Router::new().route("/api/get_task", get(|| async { StatusCode::UNAUTHORIZED }));
    let backend = serve(router).await;
    let err = backend.fetch_task().await.unwrap_err();
    assert!(matches!(err, GatewayError::Unauthorized));
}

#[tokio::test]
async fn missing_route_is_status_error() {
    let backend = serve(Router::new()).await;
    let err = backend.fetch_user_stats().await.unwrap_err();
    assert!(matches!(err, GatewayError::Status { status: 404, .. }));
    assert!(!err.retryable());
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let settings = GatewaySettings {
        base_url: format!("http://{addr}"),
        timeouts: Timeouts { request_secs: 2, connect_secs: 2 },
    };
    let backend = HttpBackend::new(&settings).unwrap();
    let err = backend.fetch_task().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(err.retryable());
}
