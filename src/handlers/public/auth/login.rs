use axum::{extract::State, Json};

use super::{Credentials, TokenResponse};
use crate::app::AppState;
use crate::error::ApiResult;
use crate::middleware::ApiJson;
use crate::services::AuthService;

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Same body and response as register. Unknown email and wrong password
/// both answer 401 with the same message.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Credentials>,
) -> ApiResult<TokenResponse> {
    let token = AuthService::new(state.store)
        .login(payload.email(), payload.password())
        .await?;

    Ok(Json(TokenResponse { token }))
}
