pub mod rsvp;

pub use rsvp::{cancel as rsvp_cancel, rsvp};
