// handlers/admin/mod.rs - Admin handlers
//
// Routes here run `jwt_auth_middleware` then `admin_middleware`, so `AdminUser`
// is always present.

pub mod events;
pub mod users;
