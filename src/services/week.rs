use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::database::models::HabitEntry;

pub const DAYS_PER_WEEK: usize = 7;

/// Weekday labels in slot order
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One slot of a weekly view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayValue {
    pub day: &'static str,
    pub value: i32,
}

/// Monday of the ISO week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Sunday of the week starting at `monday`
pub fn week_end(monday: NaiveDate) -> NaiveDate {
    monday + Duration::days(DAYS_PER_WEEK as i64 - 1)
}

/// Place each entry in its weekday slot. Entries outside the week are ignored.
pub fn scatter(monday: NaiveDate, entries: &[HabitEntry]) -> [i32; DAYS_PER_WEEK] {
    let mut values = [0; DAYS_PER_WEEK];
    for entry in entries {
        let offset = (entry.day - monday).num_days();
        if let Some(slot) = usize::try_from(offset).ok().and_then(|i| values.get_mut(i)) {
            *slot = entry.value;
        }
    }
    values
}

pub fn label_week(values: [i32; DAYS_PER_WEEK]) -> Vec<DayValue> {
    WEEKDAY_LABELS
        .into_iter()
        .zip(values)
        .map(|(day, value)| DayValue { day, value })
        .collect()
}
