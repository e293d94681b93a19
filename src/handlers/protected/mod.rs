// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `jwt_auth_middleware`, which injects `AuthUser`.
// Handlers acting on another user's record check self-or-admin themselves.

pub mod auth;
pub mod events;
pub mod users;
