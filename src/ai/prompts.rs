use crate::entries::repo_types::EntryWithFood;
use crate::goals::repo_types::DailyGoals;

const FOOD_ITEM_SHAPE: &str = r#"{
      "id": "unique_id",
      "name": "Food Name",
      "calories_per_100g": 250,
      "protein_per_100g": 15.5,
      "carbs_per_100g": 30.2,
      "fat_per_100g": 8.1,
      "fiber_per_100g": 2.5,
      "sugar_per_100g": 5.0,
      "category": "Proteins|Vegetables|Fruits|Grains|Dairy|Snacks",
      "brand": "Brand Name (if applicable)"
    }"#;

pub fn recognition() -> String {
    format!(
        r#"Analyze this food image and provide detailed nutritional information. Return a JSON response with the following structure:
{{
  "confidence": 0.85,
  "suggestions": [
    {FOOD_ITEM_SHAPE}
  ]
}}

Rules:
1. Provide 1-3 most likely food items you can identify
2. Use accurate nutritional values per 100g
3. Confidence should be between 0.1-1.0
4. Categories: Proteins, Vegetables, Fruits, Grains, Dairy, Snacks, Beverages
5. If you can't identify the food clearly, provide generic similar foods
6. Return only valid JSON, no additional text
"#
    )
}

pub fn search(query: &str) -> String {
    format!(
        r#"Search for food items matching "{query}" and provide detailed nutritional information. Return a JSON array with the following structure:
[
    {FOOD_ITEM_SHAPE}
]

Rules:
1. Provide 3-8 most relevant food items matching the search query
2. Use accurate nutritional values per 100g from reliable sources
3. Include common variations and brands if applicable
4. Categories: Proteins, Vegetables, Fruits, Grains, Dairy, Snacks, Beverages
5. Return only valid JSON array, no additional text
6. If no matches, return empty array []
"#
    )
}

pub fn advice(goals: &DailyGoals, entries: &[EntryWithFood]) -> String {
    let recent = entries
        .iter()
        .map(|e| {
            format!(
                "- {}: {}g ({})",
                e.food_name.as_deref().unwrap_or("Unknown Food"),
                e.quantity,
                e.meal_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"As a professional nutritionist, analyze this user's nutrition data and provide personalized advice:

Daily Goals:
- Calories: {calories}
- Protein: {protein}g
- Carbs: {carbs}g
- Fat: {fat}g

Recent Food Entries (last 7 days):
{recent}

Provide a JSON response with:
{{
  "overall_assessment": "Brief overall nutrition assessment",
  "recommendations": [
    "Specific actionable recommendation 1",
    "Specific actionable recommendation 2",
    "Specific actionable recommendation 3"
  ],
  "missing_nutrients": ["nutrient1", "nutrient2"],
  "excess_nutrients": ["nutrient1", "nutrient2"],
  "meal_suggestions": [
    {{
      "meal_type": "breakfast|lunch|dinner|snack",
      "suggestion": "Specific meal suggestion",
      "reason": "Why this meal is recommended"
    }}
  ]
}}

Keep advice professional, actionable, and suitable for business professionals.
"#,
        calories = goals.daily_calories,
        protein = goals.daily_protein,
        carbs = goals.daily_carbs,
        fat = goals.daily_fat,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_prompt_embeds_query() {
        let prompt = search("greek yogurt");
        assert!(prompt.contains(r#"matching "greek yogurt""#));
        assert!(prompt.contains("return empty array []"));
    }

    #[test]
    fn recognition_prompt_asks_for_json_only() {
        let prompt = recognition();
        assert!(prompt.contains("\"suggestions\""));
        assert!(prompt.contains("Return only valid JSON"));
    }

    #[test]
    fn advice_prompt_lists_goals() {
        let prompt = advice(&DailyGoals::default(), &[]);
        assert!(prompt.contains("- Calories: 2000"));
        assert!(prompt.contains("- Fat: 67g"));
    }
}
