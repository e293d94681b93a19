// handlers/public/events/show.rs - GET /api/events/:eventId

use axum::extract::State;

use crate::database::models::EventView;
use crate::middleware::{ApiResponse, ApiResult, EventId};
use crate::state::AppState;

/// 400 for a malformed id, 404 when no such event exists.
pub async fn show(State(state): State<AppState>, EventId(id): EventId) -> ApiResult<EventView> {
    let event = state.events.get_event(id).await?;
    Ok(ApiResponse::success(event))
}
