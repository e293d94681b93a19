pub mod list;
pub mod show;

pub use list::list;
pub use show::show;
