pub mod create;
pub mod delete;
pub mod update;

pub use create::create;
pub use delete::delete;
pub use update::update;
