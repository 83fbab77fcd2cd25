use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::models::Habit;
use crate::database::{DatabaseError, HabitStore};
use crate::services::week::{label_week, scatter, week_end, week_start, DayValue, DAYS_PER_WEEK};
use crate::services::ServiceError;
use crate::types::{HabitOp, HabitType};

/// A validated request to change one day's value
#[derive(Debug, Clone, Copy)]
pub struct HabitUpdate {
    pub kind: HabitType,
    pub op: HabitOp,
    pub day: NaiveDate,
    /// Only read by `HabitOp::Set`
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyReport {
    #[serde(rename = "weekStart")]
    pub week_start: NaiveDate,
    pub data: BTreeMap<HabitType, Vec<DayValue>>,
}

#[derive(Debug, Serialize)]
pub struct HabitUpdateResult {
    pub ok: bool,
    pub day: NaiveDate,
    #[serde(rename = "type")]
    pub kind: HabitType,
    pub value: i32,
    #[serde(rename = "weekStart")]
    pub week_start: NaiveDate,
    pub weekly: Vec<DayValue>,
}

pub struct HabitService {
    store: Arc<dyn HabitStore>,
}

impl HabitService {
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }

    /// Create or overwrite the value for (habit, day) and return what was stored
    pub async fn set_value(&self, habit_id: i64, day: NaiveDate, value: i32) -> Result<i32, ServiceError> {
        Ok(self.store.upsert_entry(habit_id, day, value).await?)
    }

    /// Values for the 7 days starting at `monday`, 0 where nothing was recorded
    pub async fn values_for_week(
        &self,
        habit: &Habit,
        monday: NaiveDate,
    ) -> Result<[i32; DAYS_PER_WEEK], ServiceError> {
        let entries = self
            .store
            .entries_between(habit.id, monday, week_end(monday))
            .await?;
        Ok(scatter(monday, &entries))
    }

    /// Weekly view of every habit for the week containing `day`
    pub async fn weekly(&self, user_id: i64, day: NaiveDate) -> Result<WeeklyReport, ServiceError> {
        let monday = week_start(day);
        let habits = self.store.ensure_habits(user_id).await?;

        let mut data = BTreeMap::new();
        for habit in &habits {
            let values = self.values_for_week(habit, monday).await?;
            data.insert(habit.kind, label_week(values));
        }

        Ok(WeeklyReport {
            week_start: monday,
            data,
        })
    }

    pub async fn update(&self, user_id: i64, update: HabitUpdate) -> Result<HabitUpdateResult, ServiceError> {
        let habit = self
            .store
            .ensure_habits(user_id)
            .await?
            .into_iter()
            .find(|h| h.kind == update.kind)
            .ok_or_else(|| {
                DatabaseError::NotFound(format!("{} habit for user {}", update.kind, user_id))
            })?;

        let current = self
            .store
            .find_entry(habit.id, update.day)
            .await?
            .map(|entry| entry.value)
            .unwrap_or(0);

        let new_value = update.op.apply(current, update.value);
        let value = self.set_value(habit.id, update.day, new_value).await?;

        let monday = week_start(update.day);
        let weekly = label_week(self.values_for_week(&habit, monday).await?);

        tracing::debug!(
            "user {} {:?} {} on {}: {} -> {}",
            user_id,
            update.op,
            update.kind,
            update.day,
            current,
            value
        );

        Ok(HabitUpdateResult {
            ok: true,
            day: update.day,
            kind: update.kind,
            value,
            week_start: monday,
            weekly,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, TestContext};

    fn update(kind: HabitType, op: HabitOp, day: NaiveDate, value: i64) -> HabitUpdate {
        HabitUpdate {
            kind,
            op,
            day,
            value,
        }
    }

    #[tokio::test]
    async fn inc_twice_reaches_two() {
        let ctx = TestContext::new();
        let user = ctx.create_user("inc@x.com").await;
        let service = HabitService::new(ctx.store());
        let today = date(2024, 5, 15);

        service
            .update(user.id, update(HabitType::Workout, HabitOp::Inc, today, 0))
            .await
            .unwrap();
        let second = service
            .update(user.id, update(HabitType::Workout, HabitOp::Inc, today, 0))
            .await
            .unwrap();

        assert_eq!(second.value, 2);
        assert_eq!(second.kind, HabitType::Workout);
    }

    #[tokio::test]
    async fn dec_on_empty_day_stays_at_zero() {
        let ctx = TestContext::new();
        let user = ctx.create_user("dec@x.com").await;
        let service = HabitService::new(ctx.store());

        let result = service
            .update(user.id, update(HabitType::Water, HabitOp::Dec, date(2024, 5, 15), 0))
            .await
            .unwrap();

        assert_eq!(result.value, 0);
    }

    #[tokio::test]
    async fn set_negative_clamps_to_zero() {
        let ctx = TestContext::new();
        let user = ctx.create_user("neg@x.com").await;
        let service = HabitService::new(ctx.store());
        let day = date(2024, 5, 15);

        service
            .update(user.id, update(HabitType::Sleep, HabitOp::Set, day, 6))
            .await
            .unwrap();
        let result = service
            .update(user.id, update(HabitType::Sleep, HabitOp::Set, day, -4))
            .await
            .unwrap();

        assert_eq!(result.value, 0);
    }

    #[tokio::test]
    async fn set_on_wednesday_fills_only_the_wed_slot() {
        let ctx = TestContext::new();
        let user = ctx.create_user("wed@x.com").await;
        let service = HabitService::new(ctx.store());
        let wednesday = date(2024, 5, 15);

        let result = service
            .update(user.id, update(HabitType::Water, HabitOp::Set, wednesday, 5))
            .await
            .unwrap();
        assert_eq!(result.week_start, date(2024, 5, 13));

        let report = service.weekly(user.id, date(2024, 5, 18)).await.unwrap();
        let water: Vec<i32> = report.data[&HabitType::Water].iter().map(|d| d.value).collect();
        assert_eq!(water, vec![0, 0, 5, 0, 0, 0, 0]);
        assert_eq!(report.data[&HabitType::Water][2].day, "Wed");
        assert!(report.data[&HabitType::Sleep].iter().all(|d| d.value == 0));
    }

    #[tokio::test]
    async fn weekly_covers_every_habit_for_a_fresh_user() {
        let ctx = TestContext::new();
        let user = ctx.create_user("fresh@x.com").await;
        let service = HabitService::new(ctx.store());

        let report = service.weekly(user.id, date(2024, 1, 3)).await.unwrap();

        assert_eq!(report.week_start, date(2024, 1, 1));
        assert_eq!(report.data.len(), 3);
        assert!(report.data.values().all(|week| week.len() == 7));
    }

    #[tokio::test]
    async fn weekly_for_deleted_user_is_rejected() {
        let ctx = TestContext::new();
        let service = HabitService::new(ctx.store());

        let err = service.weekly(404, date(2024, 1, 3)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Database(DatabaseError::UnknownUser(404))));

        let err = service
            .update(404, update(HabitType::Water, HabitOp::Inc, date(2024, 1, 3), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Database(DatabaseError::UnknownUser(404))));
    }

    #[tokio::test]
    async fn values_for_week_only_counts_the_window() {
        let ctx = TestContext::new();
        let user = ctx.create_user("window@x.com").await;
        let service = HabitService::new(ctx.store());
        let habit = ctx
            .store()
            .ensure_habits(user.id)
            .await
            .unwrap()
            .into_iter()
            .find(|h| h.kind == HabitType::Water)
            .unwrap();

        service.set_value(habit.id, date(2024, 5, 12), 9).await.unwrap();
        service.set_value(habit.id, date(2024, 5, 13), 1).await.unwrap();
        service.set_value(habit.id, date(2024, 5, 19), 3).await.unwrap();
        service.set_value(habit.id, date(2024, 5, 20), 9).await.unwrap();

        let values = service.values_for_week(&habit, date(2024, 5, 13)).await.unwrap();
        assert_eq!(values, [1, 0, 0, 0, 0, 0, 3]);
        assert_eq!(values.iter().filter(|v| **v != 0).count(), 2);
    }

    #[tokio::test]
    async fn weekly_serializes_with_camel_case_week_start() {
        let ctx = TestContext::new();
        let user = ctx.create_user("json@x.com").await;
        let service = HabitService::new(ctx.store());

        let report = service.weekly(user.id, date(2024, 5, 15)).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["weekStart"], "2024-05-13");
        assert_eq!(json["data"]["workout"][6]["day"], "Sun");
    }
}
