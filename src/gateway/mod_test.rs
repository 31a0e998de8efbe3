use super::*;
use crate::geometry::{Canvas, Point};
use crate::shape::{Rgb, ShapeKind, SizeRange};

fn registry() -> Registry {
    Registry::new(Canvas::new(600.0, 600.0), SizeRange { min: 20.0, max: 140.0 }, 60.0)
}

// =========================================================================
// build_request
// =========================================================================

#[test]
fn build_request_refuses_empty_canvas() {
    assert!(build_request(&TaskId::Number(1), &registry()).is_none());
}

#[test]
fn build_request_carries_task_and_shapes() {
    let mut reg = registry();
    reg.create(ShapeKind::Circle, Point::new(300.0, 300.0), Rgb::new(0xFF, 0, 0));
    reg.create(ShapeKind::Rectangle, Point::new(60.0, 60.0), Rgb::new(0, 0, 0xFF));
    let req = build_request(&TaskId::Number(7), &reg).unwrap();
    assert_eq!(req.task_id, TaskId::Number(7));
    assert_eq!(req.shapes, reg.to_serializable());

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["task_id"], 7);
    assert_eq!(json["shapes"][0]["type"], "circle");
    assert_eq!(json["shapes"][0]["position"], "50% 50%");
    assert_eq!(json["shapes"][1]["position"], "10% 10%");
    assert_eq!(json["shapes"][1]["color"], "#0000FF");
}

// =========================================================================
// Outcome
// =========================================================================

#[test]
fn valid_response_is_accepted() {
    let outcome = Outcome::from(ValidateResponse { valid: true, message: "Great job!".into(), award: Some(10) });
    assert!(outcome.is_accepted());
    assert_eq!(outcome.notice(), Notice::success("Great job! You earned 10 coins!"));
}

#[test]
fn valid_response_without_award() {
    let outcome = Outcome::from(ValidateResponse { valid: true, message: "Done".into(), award: None });
    assert_eq!(outcome, Outcome::Accepted { message: "Done".into(), award: None });
    assert_eq!(outcome.notice(), Notice::success("Done"));
}

#[test]
fn invalid_response_is_rejected() {
    let outcome = Outcome::from(ValidateResponse { valid: false, message: "Wrong color.".into(), award: None });
    assert!(!outcome.is_accepted());
    assert_eq!(outcome.notice(), Notice::error("Wrong color. Try again!"));
}

// =========================================================================
// Wire types
// =========================================================================

#[test]
fn task_parses_numeric_and_string_ids() {
    let a: Task = serde_json::from_str(r##"{"id": 3, "name": "House", "description": "Build a house",
        "target_shapes": [{"type": "square", "color": "#FF6B6B"}, {"type": "triangle", "color": "#4ECDC4", "size": 80}]}"##)
    .unwrap();
    assert_eq!(a.id, TaskId::Number(3));
    assert_eq!(a.target_shapes.len(), 2);
    assert_eq!(a.target_shapes[1].kind, ShapeKind::Triangle);
    assert_eq!(a.target_shapes[1].size, Some(80.0));

    let b: Task = serde_json::from_str(r#"{"id": "t-9", "name": "Sun"}"#).unwrap();
    assert_eq!(b.id, TaskId::Text("t-9".into()));
    assert_eq!(b.id.to_string(), "t-9");
    assert!(b.target_shapes.is_empty());
}

#[test]
fn user_stats_optional_fields() {
    let s: UserStats = serde_json::from_str(r#"{"coins": 42}"#).unwrap();
    assert_eq!(s, UserStats { coins: 42, completed_tasks: None, total_tasks: None });
}

#[test]
fn validate_response_defaults_message() {
    let r: ValidateResponse = serde_json::from_str(r#"{"valid": false}"#).unwrap();
    assert!(r.message.is_empty());
    assert!(r.award.is_none());
}

// =========================================================================
// Error codes
// =========================================================================

#[test]
fn error_codes_and_retryability() {
    assert_eq!(GatewayError::Unauthorized.error_code(), "E_UNAUTHORIZED");
    assert!(!GatewayError::Unauthorized.retryable());
    assert!(GatewayError::Transport("reset".into()).retryable());
    assert!(GatewayError::Status { status: 503, body: String::new() }.retryable());
    assert!(!GatewayError::Status { status: 400, body: String::new() }.retryable());
    assert!(!GatewayError::Decode("eof".into()).retryable());
}
