use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        })
    }
}

/// Row in `food_entries`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item_id: Uuid,
    pub quantity: i32, // grams
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    pub photo_url: Option<String>, // storage key
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub user_id: Uuid,
    pub food_item_id: Uuid,
    pub quantity: i32,
    pub meal_type: MealType,
    pub logged_at: OffsetDateTime,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
}

/// Entry joined with its catalog row. Food columns are null if the row is gone.
#[derive(Debug, Clone, FromRow)]
pub struct EntryWithFood {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub quantity: i32,
    pub meal_type: MealType,
    pub logged_at: OffsetDateTime,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub food_name: Option<String>,
    pub calories_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
}

impl EntryWithFood {
    fn scaled(&self, per_100g: Option<f64>) -> f64 {
        per_100g.unwrap_or(0.0) * self.quantity as f64 / 100.0
    }

    pub fn calories(&self) -> f64 {
        self.scaled(self.calories_per_100g)
    }

    pub fn protein(&self) -> f64 {
        self.scaled(self.protein_per_100g)
    }

    pub fn carbs(&self) -> f64 {
        self.scaled(self.carbs_per_100g)
    }

    pub fn fat(&self) -> f64 {
        self.scaled(self.fat_per_100g)
    }
}
