use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use crate::types::HabitType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: HabitType,
}

/// A recorded value for one habit on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct HabitEntry {
    pub id: i64,
    pub habit_id: i64,
    pub day: NaiveDate,
    pub value: i32,
}
