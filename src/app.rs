use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{admin, protected, public};
use crate::middleware::{admin_middleware, jwt_auth_middleware};
use crate::state::AppState;

/// Full application router with global middleware applied.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_routes(&state))
        .merge(event_routes(&state))
        .merge(user_routes(&state))
        .merge(admin_routes(&state))
        .fallback(|| async { ApiError::not_found("Route not found") })
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&config.security) {
        app = app.layer(cors);
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

/// Bearer token required.
fn authenticated(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

/// Bearer token plus admin privilege. The token layer is added last so it runs first.
fn admin_only(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    let route = route.route_layer(from_fn_with_state(state.clone(), admin_middleware));
    authenticated(state, route)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
        .route(
            "/api/auth/admin-status",
            authenticated(state, get(protected::auth::admin_status)),
        )
}

fn event_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/events",
            get(public::events::list).merge(admin_only(state, post(admin::events::create))),
        )
        .route(
            "/api/events/:eventId",
            get(public::events::show).merge(admin_only(
                state,
                axum::routing::put(admin::events::update).delete(admin::events::delete),
            )),
        )
        .route(
            "/api/events/:eventId/rsvp",
            authenticated(
                state,
                post(protected::events::rsvp).delete(protected::events::rsvp_cancel),
            ),
        )
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/users/events",
            authenticated(state, get(protected::users::my_events)),
        )
        .route(
            "/api/users/:userId",
            authenticated(state, get(protected::users::profile)),
        )
        .route(
            "/api/users/:userId/preferences",
            authenticated(state, patch(protected::users::update_preferences)),
        )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", admin_only(state, get(admin::users::list)))
        .route(
            "/api/admin/users/promote",
            admin_only(state, post(admin::users::promote)),
        )
        .route(
            "/api/admin/users/:userId",
            admin_only(state, axum::routing::delete(admin::users::delete)),
        )
}

/// `None` when CORS is disabled. A `*` entry allows any origin.
fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
