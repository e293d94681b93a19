// handlers/protected/events/rsvp.rs - POST/DELETE /api/events/:eventId/rsvp
//
// The registering user is always the token holder; a `userId` in the body is ignored.

use axum::extract::{Extension, State};

use crate::middleware::{ApiResponse, ApiResult, AuthUser, EventId};
use crate::services::RsvpResult;
use crate::state::AppState;

/// 200 `{ message, event }`. Repeating an RSVP succeeds without a second entry.
/// 400 when the event is full or its registration deadline has passed.
pub async fn rsvp(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    EventId(event_id): EventId,
) -> ApiResult<RsvpResult> {
    let result = state.events.rsvp(event_id, auth.user_id).await?;
    Ok(ApiResponse::success(result))
}

/// 200 `{ message, event }` whether or not the caller was registered.
pub async fn cancel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    EventId(event_id): EventId,
) -> ApiResult<RsvpResult> {
    let result = state.events.cancel_rsvp(event_id, auth.user_id).await?;
    Ok(ApiResponse::success(result))
}
