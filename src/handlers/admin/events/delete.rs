// handlers/admin/events/delete.rs - DELETE /api/events/:eventId

use axum::extract::State;

use crate::middleware::{message, ApiResult, EventId, Message};
use crate::state::AppState;

pub async fn delete(State(state): State<AppState>, EventId(id): EventId) -> ApiResult<Message> {
    state.events.delete_event(id).await?;
    Ok(message("Event deleted successfully"))
}
