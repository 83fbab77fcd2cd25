pub mod update;
pub mod weekly;

pub use update::update_post;
pub use weekly::weekly_get;
