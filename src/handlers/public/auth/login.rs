// handlers/public/auth/login.rs - POST /api/auth/login

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::services::{AuthSession, Credentials};
use crate::state::AppState;

/// Exchanges `{ email, password }` for `{ token, user }`.
///
/// Unknown email and wrong password both answer 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> ApiResult<AuthSession> {
    let session = state.users.login(credentials).await?;
    Ok(ApiResponse::success(session))
}
