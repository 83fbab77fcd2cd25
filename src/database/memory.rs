use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Habit, HabitEntry, User, UserGoal};
use crate::database::store::HabitStore;
use crate::types::HabitType;

/// In-process `HabitStore` used for tests and local runs without Postgres.
///
/// Mirrors the unique constraints of the SQL schema: one user per email,
/// one habit and one goal per (user, type), one entry per (habit, day).
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    users: Vec<User>,
    habits: Vec<Habit>,
    entries: HashMap<(i64, NaiveDate), HabitEntry>,
    goals: Vec<UserGoal>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Mirrors the `user_id` foreign keys on `habits` and `user_goals`
    fn require_user(&self, user_id: i64) -> Result<(), DatabaseError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(DatabaseError::UnknownUser(user_id))
        }
    }

    fn insert_default_habits(&mut self, user_id: i64) {
        for kind in HabitType::ALL {
            if !self.habits.iter().any(|h| h.user_id == user_id && h.kind == kind) {
                let id = self.next_id();
                self.habits.push(Habit { id, user_id, kind });
            }
        }
    }

    fn upsert_goal(&mut self, user_id: i64, kind: HabitType, value: i32, overwrite: bool) {
        if let Some(goal) = self.goals.iter_mut().find(|g| g.user_id == user_id && g.kind == kind) {
            if overwrite {
                goal.goal_value = value;
            }
            return;
        }

        let id = self.next_id();
        self.goals.push(UserGoal {
            id,
            user_id,
            kind,
            goal_value: value,
        });
    }

    fn insert_default_goals(&mut self, user_id: i64) {
        for kind in HabitType::ALL {
            self.upsert_goal(user_id, kind, kind.default_goal(), false);
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == email) {
            return Err(DatabaseError::Conflict("user already exists".to_string()));
        }

        let user = User {
            id: state.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        state.insert_default_habits(user.id);
        state.insert_default_goals(user.id);

        Ok(user)
    }

    async fn ensure_habits(&self, user_id: i64) -> Result<Vec<Habit>, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_user(user_id)?;
        state.insert_default_habits(user_id);

        let mut habits: Vec<Habit> = state
            .habits
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        habits.sort_by_key(|h| h.kind);
        Ok(habits)
    }

    async fn ensure_goals(&self, user_id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.require_user(user_id)?;
        state.insert_default_goals(user_id);
        Ok(())
    }

    async fn find_entry(&self, habit_id: i64, day: NaiveDate) -> Result<Option<HabitEntry>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.entries.get(&(habit_id, day)).cloned())
    }

    async fn upsert_entry(&self, habit_id: i64, day: NaiveDate, value: i32) -> Result<i32, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.habits.iter().any(|h| h.id == habit_id) {
            return Err(DatabaseError::NotFound(format!("habit {}", habit_id)));
        }

        let existing = state.entries.get(&(habit_id, day)).map(|e| e.id);
        let id = match existing {
            Some(id) => id,
            None => state.next_id(),
        };
        state.entries.insert(
            (habit_id, day),
            HabitEntry {
                id,
                habit_id,
                day,
                value,
            },
        );
        Ok(value)
    }

    async fn entries_between(
        &self,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HabitEntry>, DatabaseError> {
        let state = self.state.read().await;
        let mut entries: Vec<HabitEntry> = state
            .entries
            .values()
            .filter(|e| e.habit_id == habit_id && e.day >= from && e.day <= to)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.day);
        Ok(entries)
    }

    async fn list_goals(&self, user_id: i64) -> Result<Vec<UserGoal>, DatabaseError> {
        let state = self.state.read().await;
        let mut goals: Vec<UserGoal> = state
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        goals.sort_by_key(|g| g.kind);
        Ok(goals)
    }

    async fn upsert_goals(&self, user_id: i64, goals: &[(HabitType, i32)]) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.require_user(user_id)?;
        for (kind, value) in goals {
            state.upsert_goal(user_id, *kind, *value, true);
        }
        Ok(())
    }
}
