// handlers/public/events/list.rs - GET /api/events

use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;

use crate::database::models::{EventFilter, EventView};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Exact category match, case-insensitive
    pub category: Option<String>,
    /// `upcoming=true` drops events dated before today
    pub upcoming: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> EventFilter {
        let category = self
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty() && c != "all");
        let upcoming = matches!(self.upcoming.as_deref(), Some("true") | Some("1"));

        EventFilter {
            category,
            from_date: upcoming.then(|| Utc::now().date_naive()),
        }
    }
}

/// All events ordered by date and time, each with its creator's `{ id, fullName, email }`.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<EventView>> {
    let events = state.events.list_events(&query.into_filter()).await?;
    Ok(ApiResponse::success(events))
}
