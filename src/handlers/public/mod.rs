// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, the read-only event catalogue and service probes.

pub mod auth;
pub mod events;
pub mod system;
