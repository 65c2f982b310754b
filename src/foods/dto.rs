use serde::{Deserialize, Serialize};

use super::identifier::{FoodId, SourceTag};
use super::repo_types::{unknown_category, FoodCandidate};
use crate::ai::Source;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<FoodCandidate>,
    pub source: Source,
}

#[derive(Debug, Serialize)]
pub struct RecognizeResponse {
    pub confidence: f64,
    pub suggestions: Vec<FoodCandidate>,
    /// Storage key of the uploaded photo; pass it back when logging the entry.
    pub photo_key: Option<String>,
    pub source: Source,
}

/// User-authored food. Only name and calories are required.
#[derive(Debug, Deserialize)]
pub struct CustomFoodRequest {
    pub name: String,
    pub calories_per_100g: Option<f64>,
    #[serde(default)]
    pub protein_per_100g: Option<f64>,
    #[serde(default)]
    pub carbs_per_100g: Option<f64>,
    #[serde(default)]
    pub fat_per_100g: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CustomFoodRequest {
    pub fn into_candidate(self) -> Result<FoodCandidate, &'static str> {
        let name = self.name.trim();
        let calories = match self.calories_per_100g {
            Some(c) if !name.is_empty() && c.is_finite() && c >= 0.0 => c,
            _ => return Err("Please fill in at least the food name and calories"),
        };
        let grams = |v: Option<f64>| v.filter(|g| g.is_finite() && *g >= 0.0).unwrap_or(0.0);
        Ok(FoodCandidate {
            id: FoodId::generate(SourceTag::Custom, None),
            name: name.to_string(),
            calories_per_100g: calories,
            protein_per_100g: grams(self.protein_per_100g),
            carbs_per_100g: grams(self.carbs_per_100g),
            fat_per_100g: grams(self.fat_per_100g),
            fiber_per_100g: None,
            sugar_per_100g: None,
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(unknown_category),
            brand: None,
        })
    }
}
