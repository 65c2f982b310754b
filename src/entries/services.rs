use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime, Time, UtcOffset};
use tracing::{error, info};
use uuid::Uuid;

use super::repo::EntryLog;
use super::repo_types::{EntryWithFood, FoodEntry, MealType, NewFoodEntry};
use crate::foods::reconcile::{resolve_food_id, ReconcileError};
use crate::foods::repo::FoodCatalog;
use crate::foods::repo_types::FoodCandidate;
use crate::goals::repo_types::DailyGoals;
use crate::storage::is_user_photo_key;

#[derive(Debug, Error)]
pub enum LogEntryError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("failed to log food entry")]
    Insert(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct LogFood {
    pub food: FoodCandidate,
    pub quantity: i32,
    pub meal_type: MealType,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

impl LogFood {
    pub fn validate(&self, user_id: Uuid) -> Result<(), LogEntryError> {
        if self.food.name.trim().is_empty() {
            return Err(LogEntryError::Validation("Please select a food item"));
        }
        if !self.food.calories_per_100g.is_finite() || self.food.calories_per_100g < 0.0 {
            return Err(LogEntryError::Validation("Calories must be a non-negative number"));
        }
        if self.quantity <= 0 {
            return Err(LogEntryError::Validation("Quantity must be a positive number of grams"));
        }
        if let Some(key) = &self.photo_url {
            if !is_user_photo_key(user_id, key) {
                return Err(LogEntryError::Validation("Invalid photo key"));
            }
        }
        Ok(())
    }
}

/// Validate, resolve the food to a catalog row, then record the entry.
pub async fn log_food(
    catalog: &dyn FoodCatalog,
    entries: &dyn EntryLog,
    user_id: Uuid,
    input: LogFood,
    now: OffsetDateTime,
) -> Result<FoodEntry, LogEntryError> {
    input.validate(user_id)?;
    let food_item_id = resolve_food_id(catalog, &input.food).await?;

    let entry = entries
        .insert(&NewFoodEntry {
            user_id,
            food_item_id,
            quantity: input.quantity,
            meal_type: input.meal_type,
            logged_at: now,
            photo_url: input.photo_url,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
        })
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, %food_item_id, "insert food entry failed");
            LogEntryError::Insert(e)
        })?;

    info!(entry_id = %entry.id, %user_id, %food_item_id, "food logged");
    Ok(entry)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
        }
    }

    pub fn start(self, now: OffsetDateTime) -> OffsetDateTime {
        now - Duration::days(self.days())
    }
}

/// `[00:00, next 00:00)` of the UTC day containing `now`.
pub fn day_bounds(now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = now
        .to_offset(UtcOffset::UTC)
        .date()
        .with_time(Time::MIDNIGHT)
        .assume_utc();
    (start, start + Duration::days(1))
}

#[derive(Debug, Clone)]
pub struct DayGroup {
    pub date: Date,
    pub calories: f64,
    pub entries: Vec<EntryWithFood>,
}

#[derive(Debug, Clone)]
pub struct History {
    pub days: Vec<DayGroup>,
    pub total_calories: f64,
    /// Mean over days that have at least one entry.
    pub average_calories: f64,
}

/// Group entries (already sorted newest first) by UTC calendar day.
pub fn summarize_history(entries: Vec<EntryWithFood>) -> History {
    let mut days: Vec<DayGroup> = Vec::new();
    for entry in entries {
        let date = entry.logged_at.to_offset(UtcOffset::UTC).date();
        let calories = entry.calories();
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.calories += calories;
                day.entries.push(entry);
            }
            None => days.push(DayGroup {
                date,
                calories,
                entries: vec![entry],
            }),
        }
    }
    let total_calories: f64 = days.iter().map(|d| d.calories).sum();
    let average_calories = if days.is_empty() {
        0.0
    } else {
        total_calories / days.len() as f64
    };
    History {
        days,
        total_calories,
        average_calories,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayProgress {
    pub consumed: Totals,
    pub goal_calories: i32,
    pub remaining_calories: f64,
    /// Percent of the calorie goal, capped at 100.
    pub progress_pct: f64,
}

pub fn today_progress(entries: &[EntryWithFood], goals: &DailyGoals) -> TodayProgress {
    let consumed = entries.iter().fold(
        Totals {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        },
        |acc, e| Totals {
            calories: acc.calories + e.calories(),
            protein: acc.protein + e.protein(),
            carbs: acc.carbs + e.carbs(),
            fat: acc.fat + e.fat(),
        },
    );
    let goal = goals.daily_calories;
    let progress_pct = if goal > 0 {
        (consumed.calories / goal as f64 * 100.0).min(100.0)
    } else {
        100.0
    };
    TodayProgress {
        consumed,
        goal_calories: goal,
        remaining_calories: goal as f64 - consumed.calories,
        progress_pct,
    }
}
