use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use super::extract::{extract_array, extract_object, FormatError};
use super::{prompts, GenerativeModel, Outcome, Part};
use crate::entries::repo_types::EntryWithFood;
use crate::foods::identifier::{FoodId, SourceTag};
use crate::foods::repo_types::FoodCandidate;
use crate::goals::repo_types::DailyGoals;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    pub confidence: f64,
    pub suggestions: Vec<FoodCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    #[serde(default)]
    pub meal_type: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub overall_assessment: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub missing_nutrients: Vec<String>,
    #[serde(default)]
    pub excess_nutrients: Vec<String>,
    #[serde(default)]
    pub meal_suggestions: Vec<MealSuggestion>,
}

impl Recognition {
    fn fallback() -> Self {
        Self {
            confidence: 0.5,
            suggestions: vec![FoodCandidate {
                id: FoodId::generate(SourceTag::Fallback, None),
                name: "Unknown Food Item".into(),
                calories_per_100g: 200.0,
                protein_per_100g: 10.0,
                carbs_per_100g: 25.0,
                fat_per_100g: 8.0,
                fiber_per_100g: Some(3.0),
                sugar_per_100g: Some(5.0),
                category: "Unknown".into(),
                brand: None,
            }],
        }
    }
}

impl Advice {
    fn fallback() -> Self {
        Self {
            overall_assessment: "Unable to generate personalized advice at this time.".into(),
            recommendations: vec![
                "Maintain a balanced diet with variety".into(),
                "Stay hydrated throughout the day".into(),
                "Consider consulting with a nutritionist".into(),
            ],
            missing_nutrients: vec![],
            excess_nutrients: vec![],
            meal_suggestions: vec![],
        }
    }
}

/// Identify foods in a photo.
#[instrument(skip(model, image))]
pub async fn recognize_food(
    model: &dyn GenerativeModel,
    image: Bytes,
    mime_type: &str,
) -> Outcome<Recognition> {
    let parts = vec![
        Part::Text(prompts::recognition()),
        Part::InlineImage {
            mime_type: mime_type.to_string(),
            data: image,
        },
    ];
    let parsed = match model.generate(parts).await {
        Ok(text) => parse_recognition(&text).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match parsed {
        Ok(r) => Outcome::Parsed(r),
        Err(reason) => {
            warn!(%reason, "recognition fell back");
            Outcome::Fallback {
                value: Recognition::fallback(),
                reason,
            }
        }
    }
}

/// Free-text food search. A failed call yields an empty fallback list.
#[instrument(skip(model))]
pub async fn search_food(model: &dyn GenerativeModel, query: &str) -> Outcome<Vec<FoodCandidate>> {
    let parsed = match model.generate(vec![Part::Text(prompts::search(query))]).await {
        Ok(text) => parse_search(&text).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match parsed {
        Ok(items) => Outcome::Parsed(items),
        Err(reason) => {
            warn!(%reason, "search fell back");
            Outcome::Fallback {
                value: Vec::new(),
                reason,
            }
        }
    }
}

#[instrument(skip_all, fields(entries = entries.len()))]
pub async fn nutritional_advice(
    model: &dyn GenerativeModel,
    goals: &DailyGoals,
    entries: &[EntryWithFood],
) -> Outcome<Advice> {
    let parsed = match model
        .generate(vec![Part::Text(prompts::advice(goals, entries))])
        .await
    {
        Ok(text) => parse_advice(&text).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match parsed {
        Ok(advice) => Outcome::Parsed(advice),
        Err(reason) => {
            warn!(%reason, "advice fell back");
            Outcome::Fallback {
                value: Advice::fallback(),
                reason,
            }
        }
    }
}

pub(crate) fn parse_recognition(text: &str) -> Result<Recognition, FormatError> {
    let value = extract_object(text)?;
    let items = value
        .get("suggestions")
        .and_then(Value::as_array)
        .ok_or(FormatError::Shape("suggestions must be an array"))?;
    let suggestions = items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize_item(item, FoodId::generate(SourceTag::Recognition, Some(i))))
        .collect();
    let confidence = number(value.get("confidence"))
        .filter(|c| *c != 0.0)
        .unwrap_or(0.5)
        .clamp(0.1, 1.0);
    Ok(Recognition {
        confidence,
        suggestions,
    })
}

pub(crate) fn parse_search(text: &str) -> Result<Vec<FoodCandidate>, FormatError> {
    let items = extract_array(text)?;
    Ok(items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize_item(item, FoodId::generate(SourceTag::Search, Some(i))))
        .collect())
}

pub(crate) fn parse_advice(text: &str) -> Result<Advice, FormatError> {
    let value = extract_object(text)?;
    Ok(serde_json::from_value(value)?)
}

/// Model ids are never trusted; every item gets a fresh placeholder.
fn normalize_item(item: &Value, id: FoodId) -> FoodCandidate {
    let macro_or = |key: &str, default: f64| {
        number(item.get(key))
            .filter(|v| *v != 0.0)
            .unwrap_or(default)
    };
    FoodCandidate {
        id,
        name: text(item.get("name")).unwrap_or_else(|| "Unknown Food".into()),
        calories_per_100g: macro_or("calories_per_100g", 100.0),
        protein_per_100g: macro_or("protein_per_100g", 5.0),
        carbs_per_100g: macro_or("carbs_per_100g", 15.0),
        fat_per_100g: macro_or("fat_per_100g", 3.0),
        fiber_per_100g: number(item.get("fiber_per_100g")).filter(|v| *v != 0.0),
        sugar_per_100g: number(item.get("sugar_per_100g")).filter(|v| *v != 0.0),
        category: text(item.get("category")).unwrap_or_else(|| "Unknown".into()),
        brand: text(item.get("brand")),
    }
}

fn number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn text(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
