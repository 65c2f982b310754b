use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{EntryWithFood, MealType};
use super::services::{Period, TodayProgress};
use crate::foods::repo_types::FoodCandidate;

#[derive(Debug, Deserialize)]
pub struct LogEntryRequest {
    pub food: FoodCandidate,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "default_meal_type")]
    pub meal_type: MealType,
    #[serde(default)]
    pub photo_key: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
fn default_quantity() -> i32 { 100 }
fn default_meal_type() -> MealType { MealType::Lunch }

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub food_name: String,
    pub quantity: i32,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    pub calories: i64,
    pub protein: i64,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

impl EntryView {
    pub fn new(e: EntryWithFood, photo_url: Option<String>) -> Self {
        Self {
            calories: e.calories().round() as i64,
            protein: e.protein().round() as i64,
            id: e.id,
            food_item_id: e.food_item_id,
            food_name: e.food_name.unwrap_or_else(|| "Unknown Food".into()),
            quantity: e.quantity,
            meal_type: e.meal_type,
            logged_at: e.logged_at,
            photo_url,
            notes: e.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: String, // YYYY-MM-DD, UTC
    pub calories: i64,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub days: Vec<DayView>,
    pub total_entries: usize,
    pub total_calories: i64,
    pub average_calories: i64,
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub entries: Vec<EntryView>,
    #[serde(flatten)]
    pub progress: TodayProgress,
}
