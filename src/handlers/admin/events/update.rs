// handlers/admin/events/update.rs - PUT /api/events/:eventId

use axum::extract::State;

use crate::database::models::{EventChanges, EventView};
use crate::middleware::{ApiResponse, ApiResult, EventId, ValidatedJson};
use crate::state::AppState;

/// Partial update: absent fields keep their value. Registrations cannot be edited here,
/// and capacity may not drop below the number already registered (409).
pub async fn update(
    State(state): State<AppState>,
    EventId(id): EventId,
    ValidatedJson(changes): ValidatedJson<EventChanges>,
) -> ApiResult<EventView> {
    let event = state.events.update_event(id, changes).await?;
    Ok(ApiResponse::success(event))
}
