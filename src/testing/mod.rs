use chrono::NaiveDate;
use std::sync::Arc;

use crate::database::models::User;
use crate::database::{HabitStore, MemoryStore};

/// Shared fixtures for unit tests: an in-memory store plus user helpers
pub struct TestContext {
    store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn store(&self) -> Arc<dyn HabitStore> {
        self.store.clone()
    }

    /// Insert a user directly, skipping password hashing
    pub async fn create_user(&self, email: &str) -> User {
        self.store
            .create_user(email, "$argon2id$unused")
            .await
            .expect("failed to create test user")
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("invalid test date")
}
