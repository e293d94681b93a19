// handlers/admin/events/create.rs - POST /api/events

use axum::extract::{Extension, State};

use crate::database::models::{EventView, NewEvent};
use crate::middleware::{AdminUser, ApiResponse, ApiResult, ValidatedJson};
use crate::state::AppState;

/// Creates an event owned by the calling admin.
///
/// Expected input:
/// ```json
/// {
///   "title": "string",
///   "date": "YYYY-MM-DD",
///   "time": "HH:MM",
///   "location": "string",
///   "description": "string",
///   "category": "string",
///   "capacity": 50,
///   "isPrivate": false,
///   "registrationDeadline": "2030-01-01T18:00:00Z"
/// }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    ValidatedJson(input): ValidatedJson<NewEvent>,
) -> ApiResult<EventView> {
    let event = state.events.create_event(input, admin.id).await?;
    Ok(ApiResponse::created(event))
}
