use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, decoded from the bearer token. Privilege is not
/// carried here; guards re-read the stored user.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Rejects requests without a valid bearer token and injects `AuthUser` otherwise
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = state.tokens.verify(token)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let invalid = || ApiError::unauthorized("Invalid token or unauthorized");

    let token = auth_header
        .to_str()
        .map_err(|_| invalid())?
        .strip_prefix("Bearer ")
        .ok_or_else(invalid)?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("No token provided"));
    }
    Ok(token)
}
