use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiResult;
use crate::handlers::protected::parse_day;
use crate::middleware::{ApiJson, AuthUser};
use crate::services::{HabitService, HabitUpdate, HabitUpdateResult, ServiceError};
use crate::types::{coerce_int, HabitOp, HabitType};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl UpdateRequest {
    /// Validate every field before anything is written
    pub fn into_update(self) -> Result<HabitUpdate, ServiceError> {
        let kind = self
            .kind
            .as_deref()
            .unwrap_or_default()
            .parse::<HabitType>()
            .map_err(|_| ServiceError::invalid_field("type", "invalid habit type"))?;

        let op = self
            .op
            .as_deref()
            .unwrap_or_default()
            .parse::<HabitOp>()
            .map_err(|_| ServiceError::invalid_field("op", "invalid op"))?;

        let day = parse_day(self.date.as_deref(), "date")?;

        // Only `set` reads the value; absent or null means 0
        let value = match (op, self.value) {
            (HabitOp::Set, Some(raw)) if !raw.is_null() => coerce_int(&raw)
                .ok_or_else(|| ServiceError::invalid_field("value", "value must be an integer"))?,
            _ => 0,
        };

        Ok(HabitUpdate {
            kind,
            op,
            day,
            value,
        })
    }
}

/// POST /habits/update - Increment, decrement or set one day's value
///
/// Expected Input:
/// ```json
/// { "type": "water", "op": "inc" | "dec" | "set", "date": "2024-05-15", "value": 5 }
/// ```
/// `date` defaults to today and `value` is only used by `set`.
///
/// Expected Output:
/// ```json
/// {
///   "ok": true,
///   "day": "2024-05-15",
///   "type": "water",
///   "value": 5,
///   "weekStart": "2024-05-13",
///   "weekly": [{"day": "Mon", "value": 0}, ...]
/// }
/// ```
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<UpdateRequest>,
) -> ApiResult<HabitUpdateResult> {
    let update = payload.into_update()?;
    let result = HabitService::new(state.store)
        .update(auth_user.user_id, update)
        .await?;

    Ok(Json(result))
}
