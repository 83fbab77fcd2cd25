use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::HabitStore;
use crate::services::ServiceError;
use crate::types::{coerce_int, HabitType};

/// Goal value per habit type, serialized as `{"water": 8, "sleep": 7, "workout": 1}`
pub type GoalMap = BTreeMap<HabitType, i32>;

pub struct GoalService {
    store: Arc<dyn HabitStore>,
}

impl GoalService {
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }

    /// Current goals, creating defaults for any type the user is missing
    pub async fn get_goals(&self, user_id: i64) -> Result<GoalMap, ServiceError> {
        self.store.ensure_goals(user_id).await?;
        self.goal_map(user_id).await
    }

    /// Apply updates and return the complete mapping afterwards
    pub async fn update_goals(
        &self,
        user_id: i64,
        updates: &[(HabitType, i32)],
    ) -> Result<GoalMap, ServiceError> {
        self.store.ensure_goals(user_id).await?;
        if !updates.is_empty() {
            self.store.upsert_goals(user_id, updates).await?;
            tracing::debug!("user {} updated {} goal(s)", user_id, updates.len());
        }
        self.goal_map(user_id).await
    }

    async fn goal_map(&self, user_id: i64) -> Result<GoalMap, ServiceError> {
        Ok(self
            .store
            .list_goals(user_id)
            .await?
            .into_iter()
            .map(|goal| (goal.kind, goal.goal_value))
            .collect())
    }
}

/// Turn a `{type: value}` JSON object into typed updates.
///
/// Keys that are not habit types are skipped. Values must coerce to an
/// integer that fits in `i32`.
pub fn parse_goal_updates(raw: &Map<String, Value>) -> Result<Vec<(HabitType, i32)>, ServiceError> {
    let mut updates = Vec::new();
    for (key, value) in raw {
        let Ok(kind) = key.parse::<HabitType>() else {
            continue;
        };
        let goal = coerce_int(value)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| ServiceError::invalid_field(key, format!("goal for {} must be an integer", kind)))?;
        updates.push((kind, goal));
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseError;
    use crate::testing::TestContext;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn unknown_user_gets_no_goals() {
        let ctx = TestContext::new();
        let service = GoalService::new(ctx.store());

        let err = service.get_goals(77).await.unwrap_err();
        assert!(matches!(err, ServiceError::Database(DatabaseError::UnknownUser(77))));
        assert!(service.update_goals(77, &[(HabitType::Water, 3)]).await.is_err());
    }

    #[tokio::test]
    async fn defaults_are_created_on_first_read() {
        let ctx = TestContext::new();
        let user = ctx.create_user("defaults@x.com").await;
        let service = GoalService::new(ctx.store());

        let goals = service.get_goals(user.id).await.unwrap();

        assert_eq!(goals[&HabitType::Water], 8);
        assert_eq!(goals[&HabitType::Sleep], 7);
        assert_eq!(goals[&HabitType::Workout], 1);
    }

    #[tokio::test]
    async fn defaulting_is_idempotent() {
        let ctx = TestContext::new();
        let user = ctx.create_user("idem@x.com").await;
        let service = GoalService::new(ctx.store());

        let first = service.get_goals(user.id).await.unwrap();
        let second = service.get_goals(user.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(ctx.store().list_goals(user.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_defaults() {
        let ctx = TestContext::new();
        let user = ctx.create_user("goals@x.com").await;
        let service = GoalService::new(ctx.store());

        let updated = service
            .update_goals(user.id, &[(HabitType::Water, 10)])
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&updated).unwrap(),
            json!({"water": 10, "sleep": 7, "workout": 1})
        );
        assert_eq!(service.get_goals(user.id).await.unwrap(), updated);
    }

    #[test]
    fn parse_skips_unknown_keys_and_coerces_values() {
        let updates = parse_goal_updates(&object(json!({
            "water": "12",
            "steps": 10000,
            "workout": 2.0
        })))
        .unwrap();

        assert_eq!(updates.len(), 2);
        assert!(updates.contains(&(HabitType::Water, 12)));
        assert!(updates.contains(&(HabitType::Workout, 2)));
    }

    #[test]
    fn parse_rejects_non_numeric_values() {
        let err = parse_goal_updates(&object(json!({"sleep": "lots"}))).unwrap_err();
        match err {
            ServiceError::Validation { field_errors, .. } => {
                assert!(field_errors.unwrap().contains_key("sleep"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_values_outside_i32() {
        assert!(parse_goal_updates(&object(json!({"water": 1_i64 << 40}))).is_err());
    }
}
