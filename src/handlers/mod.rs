// handlers/mod.rs - handlers grouped by security tier
//
// Public (no auth) → Protected (bearer token) → Admin (bearer token + admin privilege)

pub mod admin;
pub mod protected;
pub mod public;
