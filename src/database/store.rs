use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::manager::DatabaseError;
use crate::database::models::{Habit, HabitEntry, User, UserGoal};
use crate::types::HabitType;

/// Storage operations the service layer needs.
///
/// Every method is atomic on its own. Methods that touch several rows
/// (`create_user`, `upsert_goals`) run inside a single transaction.
/// "Ensure" methods are idempotent insert-if-absent reconciliations.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Round-trip to the backing store
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Create a user together with its default habits and goals.
    /// Fails with `DatabaseError::Conflict` if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError>;

    /// Make sure the user has one habit per type and return all of them
    async fn ensure_habits(&self, user_id: i64) -> Result<Vec<Habit>, DatabaseError>;

    /// Make sure the user has one goal per type, using the default values for new rows
    async fn ensure_goals(&self, user_id: i64) -> Result<(), DatabaseError>;

    async fn find_entry(&self, habit_id: i64, day: NaiveDate) -> Result<Option<HabitEntry>, DatabaseError>;

    /// Insert or overwrite the entry for (habit, day), returning the stored value
    async fn upsert_entry(&self, habit_id: i64, day: NaiveDate, value: i32) -> Result<i32, DatabaseError>;

    /// Entries with `from <= day <= to`
    async fn entries_between(
        &self,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HabitEntry>, DatabaseError>;

    async fn list_goals(&self, user_id: i64) -> Result<Vec<UserGoal>, DatabaseError>;

    /// Insert or overwrite several goals in one transaction
    async fn upsert_goals(&self, user_id: i64, goals: &[(HabitType, i32)]) -> Result<(), DatabaseError>;
}
