// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Campus Events API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/auth/register, /api/auth/login (public), /api/auth/admin-status (bearer)",
                "events": "/api/events[/:eventId] (public read, admin write)",
                "rsvp": "/api/events/:eventId/rsvp (bearer)",
                "users": "/api/users/events, /api/users/:userId[/preferences] (bearer)",
                "admin": "/api/admin/users[/:userId | /promote] (admin)",
                "health": "/health (public)"
            }
        }
    }))
}

/// 200 when the store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
