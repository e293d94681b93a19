// handlers/public/auth/register.rs - POST /api/auth/register

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::services::{AuthSession, Registration};
use crate::state::AppState;

/// Creates an account and signs the caller in.
///
/// Expected input:
/// ```json
/// {
///   "fullName": "string",
///   "email": "string",
///   "password": "string",
///   "preferences": { "academic": true, "sports": false }
/// }
/// ```
///
/// 201 with `{ token, user }`; 400 on missing fields; 409 when the email is taken.
/// An `isAdmin` field in the body is ignored.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<Registration>,
) -> ApiResult<AuthSession> {
    let session = state.users.register(input).await?;
    Ok(ApiResponse::created(session))
}
