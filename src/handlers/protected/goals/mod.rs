use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{ApiJson, AuthUser};
use crate::services::goal_service::parse_goal_updates;
use crate::services::{GoalMap, GoalService};

#[derive(Debug, Default, Deserialize)]
pub struct GoalsRequest {
    #[serde(default)]
    pub goals: Option<Value>,
}

/// GET /goals - Goal per habit type, defaults created on first access
///
/// Expected Output:
/// ```json
/// { "water": 8, "sleep": 7, "workout": 1 }
/// ```
pub async fn goals_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<GoalMap> {
    let goals = GoalService::new(state.store)
        .get_goals(auth_user.user_id)
        .await?;

    Ok(Json(goals))
}

/// POST /goals - Update some goals, returning all three afterwards
///
/// Expected Input:
/// ```json
/// { "goals": { "water": 10 } }
/// ```
/// Unknown keys are ignored. A missing `goals` key changes nothing.
pub async fn goals_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<GoalsRequest>,
) -> ApiResult<GoalMap> {
    let updates = match payload.goals {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(raw)) => parse_goal_updates(&raw)?,
        Some(_) => return Err(ApiError::bad_request("goals must be an object")),
    };

    let goals = GoalService::new(state.store)
        .update_goals(auth_user.user_id, &updates)
        .await?;

    Ok(Json(goals))
}
