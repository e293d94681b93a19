pub mod admin;
pub mod auth;
pub mod extract;
pub mod response;

pub use admin::{admin_middleware, AdminUser};
pub use auth::{jwt_auth_middleware, AuthUser};
pub use extract::{EventId, UserId, ValidatedJson};
pub use response::{message, ApiResponse, ApiResult, Message};
