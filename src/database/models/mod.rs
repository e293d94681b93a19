pub mod event;
pub mod user;

pub use event::{Event, EventChanges, EventFilter, EventView, NewEvent, RsvpCheck};
pub use user::{normalize_email, Preferences, User, UserProfile, UserSummary};
