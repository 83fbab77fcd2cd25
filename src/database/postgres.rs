use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Habit, HabitEntry, User, UserGoal};
use crate::database::store::HabitStore;
use crate::types::HabitType;

/// `HabitStore` backed by Postgres
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_default_habits(conn: &mut PgConnection, user_id: i64) -> Result<(), DatabaseError> {
        for kind in HabitType::ALL {
            sqlx::query(
                "INSERT INTO habits (user_id, type) VALUES ($1, $2)
                 ON CONFLICT (user_id, type) DO NOTHING",
            )
            .bind(user_id)
            .bind(kind)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_missing_user(e, user_id))?;
        }
        Ok(())
    }

    async fn insert_default_goals(conn: &mut PgConnection, user_id: i64) -> Result<(), DatabaseError> {
        for kind in HabitType::ALL {
            sqlx::query(
                "INSERT INTO user_goals (user_id, type, goal_value) VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, type) DO NOTHING",
            )
            .bind(user_id)
            .bind(kind)
            .bind(kind.default_goal())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_missing_user(e, user_id))?;
        }
        Ok(())
    }
}

fn map_missing_user(err: sqlx::Error, user_id: i64) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => DatabaseError::UnknownUser(user_id),
        _ => DatabaseError::Sqlx(err),
    }
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DatabaseError::Conflict(format!("{} already exists", what))
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl HabitStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        // Rolls back on drop if any step below fails
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2)
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "user"))?;

        Self::insert_default_habits(&mut tx, user.id).await?;
        Self::insert_default_goals(&mut tx, user.id).await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn ensure_habits(&self, user_id: i64) -> Result<Vec<Habit>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_default_habits(&mut conn, user_id).await?;

        let habits = sqlx::query_as::<_, Habit>(
            "SELECT id, user_id, type FROM habits WHERE user_id = $1 ORDER BY type",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(habits)
    }

    async fn ensure_goals(&self, user_id: i64) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_default_goals(&mut conn, user_id).await
    }

    async fn find_entry(&self, habit_id: i64, day: NaiveDate) -> Result<Option<HabitEntry>, DatabaseError> {
        let entry = sqlx::query_as::<_, HabitEntry>(
            "SELECT id, habit_id, day, value FROM habit_entries WHERE habit_id = $1 AND day = $2",
        )
        .bind(habit_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn upsert_entry(&self, habit_id: i64, day: NaiveDate, value: i32) -> Result<i32, DatabaseError> {
        let (stored,): (i32,) = sqlx::query_as(
            "INSERT INTO habit_entries (habit_id, day, value) VALUES ($1, $2, $3)
             ON CONFLICT (habit_id, day) DO UPDATE SET value = EXCLUDED.value
             RETURNING value",
        )
        .bind(habit_id)
        .bind(day)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn entries_between(
        &self,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HabitEntry>, DatabaseError> {
        let entries = sqlx::query_as::<_, HabitEntry>(
            "SELECT id, habit_id, day, value FROM habit_entries
             WHERE habit_id = $1 AND day >= $2 AND day <= $3
             ORDER BY day",
        )
        .bind(habit_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn list_goals(&self, user_id: i64) -> Result<Vec<UserGoal>, DatabaseError> {
        let goals = sqlx::query_as::<_, UserGoal>(
            "SELECT id, user_id, type, goal_value FROM user_goals WHERE user_id = $1 ORDER BY type",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    async fn upsert_goals(&self, user_id: i64, goals: &[(HabitType, i32)]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for (kind, value) in goals {
            sqlx::query(
                "INSERT INTO user_goals (user_id, type, goal_value) VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, type) DO UPDATE SET goal_value = EXCLUDED.goal_value",
            )
            .bind(user_id)
            .bind(*kind)
            .bind(*value)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_missing_user(e, user_id))?;
        }

        tx.commit().await?;
        Ok(())
    }
}
