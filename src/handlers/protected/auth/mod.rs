pub mod admin_status;

pub use admin_status::admin_status;
