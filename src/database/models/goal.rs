use serde::Serialize;
use sqlx::FromRow;

use crate::types::HabitType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserGoal {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: HabitType,
    pub goal_value: i32,
}
