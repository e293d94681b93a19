// handlers/admin/users/list.rs - GET /api/admin/users

use axum::extract::State;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserProfile>> {
    let users = state.users.list_users().await?;
    Ok(ApiResponse::success(users))
}
