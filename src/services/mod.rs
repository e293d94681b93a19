pub mod event_service;
pub mod user_service;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

pub use event_service::{EventService, RsvpResult};
pub use user_service::{AdminStatus, AuthSession, Credentials, Registration, UserService};

/// Business-rule failures shared by the user and event services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("event not found")]
    EventNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error("access denied")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("event is full")]
    EventFull,

    #[error("registration deadline has passed")]
    DeadlinePassed,

    #[error("capacity below {registered} current registrations")]
    CapacityBelowRegistrations { registered: usize },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
