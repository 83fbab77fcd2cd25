use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiResult;
use crate::handlers::protected::parse_day;
use crate::middleware::AuthUser;
use crate::services::{HabitService, WeeklyReport};

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    /// Any day of the requested week (ISO `YYYY-MM-DD`), defaults to today
    pub date: Option<String>,
}

/// GET /habits/weekly - Monday-to-Sunday values for every habit
///
/// Expected Output:
/// ```json
/// {
///   "weekStart": "2024-05-13",
///   "data": {
///     "water":   [{"day": "Mon", "value": 3}, ... 7 entries],
///     "sleep":   [...],
///     "workout": [...]
///   }
/// }
/// ```
pub async fn weekly_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<WeeklyQuery>,
) -> ApiResult<WeeklyReport> {
    let day = parse_day(query.date.as_deref(), "date")?;
    let report = HabitService::new(state.store)
        .weekly(auth_user.user_id, day)
        .await?;

    Ok(Json(report))
}
