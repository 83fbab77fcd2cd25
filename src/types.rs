//! Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The closed set of habits a user can track.
/// Stored as the `habit_type` Postgres enum and serialized lowercase on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "habit_type", rename_all = "lowercase")]
pub enum HabitType {
    Water,
    Sleep,
    Workout,
}

impl HabitType {
    pub const ALL: [HabitType; 3] = [HabitType::Water, HabitType::Sleep, HabitType::Workout];

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitType::Water => "water",
            HabitType::Sleep => "sleep",
            HabitType::Workout => "workout",
        }
    }

    /// Goal assigned when a user has not set one yet
    pub fn default_goal(&self) -> i32 {
        match self {
            HabitType::Water => 8,
            HabitType::Sleep => 7,
            HabitType::Workout => 1,
        }
    }
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid habit type: {0}")]
pub struct InvalidHabitType(pub String);

impl FromStr for HabitType {
    type Err = InvalidHabitType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water" => Ok(HabitType::Water),
            "sleep" => Ok(HabitType::Sleep),
            "workout" => Ok(HabitType::Workout),
            other => Err(InvalidHabitType(other.to_string())),
        }
    }
}

/// Mutation applied to a single day's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitOp {
    Inc,
    Dec,
    Set,
}

impl HabitOp {
    /// Compute the new value for a day. Results never go below zero.
    pub fn apply(&self, current: i32, provided: i64) -> i32 {
        match self {
            HabitOp::Inc => current.saturating_add(1),
            HabitOp::Dec => current.saturating_sub(1).max(0),
            HabitOp::Set => provided.clamp(0, i64::from(i32::MAX)) as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid op: {0}")]
pub struct InvalidHabitOp(pub String);

impl FromStr for HabitOp {
    type Err = InvalidHabitOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" => Ok(HabitOp::Inc),
            "dec" => Ok(HabitOp::Dec),
            "set" => Ok(HabitOp::Set),
            other => Err(InvalidHabitOp(other.to_string())),
        }
    }
}

/// Loose integer coercion for client-supplied numbers.
///
/// Accepts integers, floats (truncated toward zero), booleans and numeric
/// strings. Returns `None` for anything else, including `null`.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
