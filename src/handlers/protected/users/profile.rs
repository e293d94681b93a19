// handlers/protected/users/profile.rs - GET /api/users/:userId

use axum::extract::{Extension, State};

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, UserId};
use crate::state::AppState;

/// Own profile, or anyone's for an admin. Never includes the password hash.
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    UserId(user_id): UserId,
) -> ApiResult<UserProfile> {
    state.users.ensure_self_or_admin(auth.user_id, user_id).await?;
    let profile = state.users.get_profile(user_id).await?;
    Ok(ApiResponse::success(profile))
}
