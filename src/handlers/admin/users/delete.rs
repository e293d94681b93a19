// handlers/admin/users/delete.rs - DELETE /api/admin/users/:userId

use axum::extract::State;

use crate::middleware::{message, ApiResult, Message, UserId};
use crate::state::AppState;

/// Removes the account. Event registrations that reference it are kept.
pub async fn delete(State(state): State<AppState>, UserId(id): UserId) -> ApiResult<Message> {
    state.users.delete_user(id).await?;
    Ok(message("User deleted successfully"))
}
