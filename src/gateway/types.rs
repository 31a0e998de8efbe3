//! Wire types exchanged with the task backend.

use serde::{Deserialize, Serialize};

use crate::shape::{Rgb, SerializedShape, ShapeKind};

/// Backend task identifier. Accepted as either a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One shape the task asks the user to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetShape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub color: Rgb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

/// `GET /api/get_task` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_shapes: Vec<TargetShape>,
}

/// `GET /api/user_stats` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub coins: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_tasks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<u32>,
}

/// `POST /api/validate_shape` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub task_id: TaskId,
    pub shapes: Vec<SerializedShape>,
}

/// `POST /api/validate_shape` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award: Option<i64>,
}
