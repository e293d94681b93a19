// handlers/protected/users/preferences.rs - PATCH /api/users/:userId/preferences

use axum::extract::{Extension, State};
use serde::Deserialize;
use validator::Validate;

use crate::database::models::{Preferences, UserProfile};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, UserId, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PreferencesUpdate {
    #[validate(required(message = "Preferences are required"))]
    pub preferences: Option<Preferences>,
}

/// Replaces the interest flags. Flags left out of the object become false.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    UserId(user_id): UserId,
    ValidatedJson(body): ValidatedJson<PreferencesUpdate>,
) -> ApiResult<UserProfile> {
    state.users.ensure_self_or_admin(auth.user_id, user_id).await?;
    let preferences = body.preferences.unwrap_or_default();
    let profile = state.users.update_preferences(user_id, preferences).await?;
    Ok(ApiResponse::success(profile))
}
