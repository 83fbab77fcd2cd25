// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind `middleware::jwt_auth_middleware`, which injects
// an `AuthUser` extension. Handlers scope every query to that user.

pub mod goals;
pub mod habits;

use chrono::{Local, NaiveDate};

use crate::services::ServiceError;

/// Parse an optional ISO date, falling back to today's local date
pub(crate) fn parse_day(raw: Option<&str>, field: &str) -> Result<NaiveDate, ServiceError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Local::now().date_naive()),
        Some(s) => s
            .parse::<NaiveDate>()
            .map_err(|_| ServiceError::invalid_field(field, format!("invalid date: {}", s))),
    }
}
