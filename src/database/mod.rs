pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{InMemoryEventRepository, InMemoryUserRepository};
pub use postgres::{PgEventRepository, PgUserRepository};
pub use repository::{DbResult, EventRepository, RsvpOutcome, UpdateOutcome, UserRepository};
