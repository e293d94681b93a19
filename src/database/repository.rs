use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Event, EventFilter, Preferences, User};

pub type DbResult<T> = Result<T, DatabaseError>;

/// Result of an RSVP attempt against a stored event.
#[derive(Debug, Clone, PartialEq)]
pub enum RsvpOutcome {
    Added(Event),
    AlreadyRegistered(Event),
    DeadlinePassed(Event),
    Full(Event),
}

/// Result of writing admin edits to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Event),
    NotFound,
    /// The new capacity is below the number of current registrations.
    CapacityBelowRegistrations { registered: usize },
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::Duplicate` when the email is taken.
    async fn create(&self, user: User) -> DbResult<User>;

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;

    async fn find_many(&self, ids: &[Uuid]) -> DbResult<Vec<User>>;

    async fn list(&self) -> DbResult<Vec<User>>;

    async fn update_preferences(&self, id: Uuid, preferences: Preferences) -> DbResult<Option<User>>;

    async fn set_admin(&self, email: &str, is_admin: bool) -> DbResult<Option<User>>;

    /// Returns false when no user had that id.
    async fn delete(&self, id: Uuid) -> DbResult<bool>;

    async fn ping(&self) -> DbResult<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: Event) -> DbResult<Event>;

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Event>>;

    /// Ordered by date, then time.
    async fn list(&self, filter: &EventFilter) -> DbResult<Vec<Event>>;

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<Event>>;

    /// Writes the editable fields of `event`. Registrations in the store are kept.
    async fn update(&self, event: &Event) -> DbResult<UpdateOutcome>;

    async fn delete(&self, id: Uuid) -> DbResult<bool>;

    /// Check-and-append as one atomic step. `None` when the event does not exist.
    async fn register_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> DbResult<Option<RsvpOutcome>>;

    /// Removes the user if present. `None` when the event does not exist.
    async fn unregister_user(&self, event_id: Uuid, user_id: Uuid) -> DbResult<Option<Event>>;
}
