pub mod events;
pub mod preferences;
pub mod profile;

pub use events::my_events;
pub use preferences::update_preferences;
pub use profile::profile;
