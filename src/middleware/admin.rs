use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::database::models::User;
use crate::error::ApiError;
use crate::services::ServiceError;
use crate::state::AppState;

use super::auth::AuthUser;

/// The re-fetched caller, present only on routes behind `admin_middleware`
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

/// Requires `jwt_auth_middleware` to have run first. The token's admin claim is not
/// trusted: the stored user is loaded and checked against the flag and the allow-list.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let user = match state.users.find(auth_user.user_id).await {
        Ok(user) => user,
        Err(ServiceError::UserNotFound) => {
            return Err(ApiError::unauthorized("Invalid token or unauthorized"));
        }
        Err(e) => return Err(e.into()),
    };

    if !state.users.admins().is_admin(&user) {
        tracing::warn!(user_id = %user.id, "admin access denied");
        return Err(ApiError::forbidden("Admin access required"));
    }

    request.extensions_mut().insert(AdminUser(user));
    Ok(next.run(request).await)
}
