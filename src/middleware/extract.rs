use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed its `validator` rules
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// `:eventId` path segment parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct EventId(pub Uuid);

/// `:userId` path segment parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

async fn uuid_from_path<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
    message: &'static str,
) -> Result<Uuid, ApiError> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|_| ApiError::bad_request(message))?;
    Uuid::parse_str(&raw).map_err(|_| ApiError::bad_request(message))
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for EventId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        uuid_from_path(parts, state, "Invalid event ID format").await.map(Self)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        uuid_from_path(parts, state, "Invalid user ID format").await.map(Self)
    }
}
