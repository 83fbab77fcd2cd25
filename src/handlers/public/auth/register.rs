use axum::{extract::State, Json};

use super::{Credentials, TokenResponse};
use crate::app::AppState;
use crate::error::ApiResult;
use crate::middleware::ApiJson;
use crate::services::AuthService;

/// POST /auth/register - Register new user account
///
/// Creates the user along with its three habits and default goals.
///
/// Expected Input:
/// ```json
/// { "email": "a@x.com", "password": "pw1" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Errors: 400 when email or password is empty, 409 when the email is taken.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<TokenResponse> {
    let token = AuthService::new(state.store)
        .register(payload.email(), payload.password())
        .await?;

    Ok(Json(TokenResponse { token }))
}
