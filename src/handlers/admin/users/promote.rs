// handlers/admin/users/promote.rs - POST /api/admin/users/promote

use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PromoteRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct Promoted {
    pub message: &'static str,
    pub email: String,
}

/// Sets the stored admin flag on the account with this email; 404 if there is none.
pub async fn promote(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PromoteRequest>,
) -> ApiResult<Promoted> {
    let user = state.users.promote_admin(&body.email).await?;
    Ok(ApiResponse::success(Promoted {
        message: "User is now an admin",
        email: user.email,
    }))
}
