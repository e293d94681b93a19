// handlers/protected/users/events.rs - GET /api/users/events

use axum::extract::{Extension, State};

use crate::database::models::EventView;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// Events the caller is registered for.
pub async fn my_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<EventView>> {
    let events = state.events.events_for_user(auth.user_id).await?;
    Ok(ApiResponse::success(events))
}
