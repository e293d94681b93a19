// handlers/protected/auth/admin_status.rs - GET /api/auth/admin-status

use axum::extract::{Extension, State};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AdminStatus;
use crate::state::AppState;

/// Reports whether the caller currently holds admin privilege, read from the stored
/// user rather than the token.
pub async fn admin_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<AdminStatus> {
    let status = state.users.admin_status(auth.user_id).await?;
    Ok(ApiResponse::success(status))
}
