pub mod delete;
pub mod list;
pub mod promote;

pub use delete::delete;
pub use list::list;
pub use promote::promote;
