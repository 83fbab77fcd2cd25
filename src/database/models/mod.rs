pub mod goal;
pub mod habit;
pub mod user;

pub use goal::UserGoal;
pub use habit::{Habit, HabitEntry};
pub use user::User;
