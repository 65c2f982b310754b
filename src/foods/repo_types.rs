use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::identifier::FoodId;

/// Catalog row in `food_items`. Nutrient values are per 100 g.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: Option<f64>,
    pub sugar_per_100g: Option<f64>,
    pub category: String,
    pub brand: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Values inserted when a candidate is promoted to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFoodItem {
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub fiber_per_100g: Option<f64>,
    pub sugar_per_100g: Option<f64>,
    pub category: String,
    pub brand: Option<String>,
}

/// A food record that may or may not exist in the catalog yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCandidate {
    pub id: FoodId,
    pub name: String,
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein_per_100g: f64,
    #[serde(default)]
    pub carbs_per_100g: f64,
    #[serde(default)]
    pub fat_per_100g: f64,
    #[serde(default)]
    pub fiber_per_100g: Option<f64>,
    #[serde(default)]
    pub sugar_per_100g: Option<f64>,
    #[serde(default = "unknown_category")]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
}

pub(crate) fn unknown_category() -> String {
    "Unknown".to_string()
}

impl FoodCandidate {
    pub fn to_new_item(&self) -> NewFoodItem {
        NewFoodItem {
            name: self.name.clone(),
            calories_per_100g: self.calories_per_100g,
            protein_per_100g: self.protein_per_100g,
            carbs_per_100g: self.carbs_per_100g,
            fat_per_100g: self.fat_per_100g,
            fiber_per_100g: self.fiber_per_100g.filter(|v| *v != 0.0),
            sugar_per_100g: self.sugar_per_100g.filter(|v| *v != 0.0),
            category: self.category.clone(),
            brand: self.brand.clone().filter(|b| !b.trim().is_empty()),
        }
    }
}

impl From<FoodItem> for FoodCandidate {
    fn from(item: FoodItem) -> Self {
        Self {
            id: FoodId::Persisted(item.id),
            name: item.name,
            calories_per_100g: item.calories_per_100g,
            protein_per_100g: item.protein_per_100g,
            carbs_per_100g: item.carbs_per_100g,
            fat_per_100g: item.fat_per_100g,
            fiber_per_100g: item.fiber_per_100g,
            sugar_per_100g: item.sugar_per_100g,
            category: item.category,
            brand: item.brand,
        }
    }
}
