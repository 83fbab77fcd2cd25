pub mod auth_service;
pub mod goal_service;
pub mod habit_service;
pub mod week;

pub use auth_service::AuthService;
pub use goal_service::{GoalMap, GoalService};
pub use habit_service::{HabitService, HabitUpdate, HabitUpdateResult, WeeklyReport};

use std::collections::HashMap;
use thiserror::Error;

use crate::auth::{JwtError, PasswordError};
use crate::database::DatabaseError;

/// Domain-level failures, mapped to HTTP statuses in `crate::error`
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Validation failure attributed to a single request field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ServiceError::Validation {
            message,
            field_errors: Some(field_errors),
        }
    }
}
