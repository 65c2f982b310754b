use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user daily targets. Calories in kcal, macros in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyGoals {
    pub daily_calories: i32,
    pub daily_protein: i32,
    pub daily_carbs: i32,
    pub daily_fat: i32,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            daily_calories: 2000,
            daily_protein: 150,
            daily_carbs: 250,
            daily_fat: 67,
        }
    }
}

/// Share of calories from each macro, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroBreakdown {
    pub protein_pct: i64,
    pub carbs_pct: i64,
    pub fat_pct: i64,
}

impl DailyGoals {
    pub fn breakdown(&self) -> MacroBreakdown {
        let pct = |grams: i32, kcal_per_gram: f64| {
            if self.daily_calories <= 0 {
                return 0;
            }
            (grams as f64 * kcal_per_gram / self.daily_calories as f64 * 100.0).round() as i64
        };
        MacroBreakdown {
            protein_pct: pct(self.daily_protein, 4.0),
            carbs_pct: pct(self.daily_carbs, 4.0),
            fat_pct: pct(self.daily_fat, 9.0),
        }
    }

    /// Rough basal metabolic rate, three quarters of the calorie target.
    pub fn estimated_bmr(&self) -> i64 {
        (self.daily_calories as f64 * 0.75).round() as i64
    }

    pub fn is_valid(&self) -> bool {
        self.daily_calories >= 0
            && self.daily_protein >= 0
            && self.daily_carbs >= 0
            && self.daily_fat >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_goal_breakdown() {
        let goals = DailyGoals::default();
        assert_eq!(
            goals.breakdown(),
            MacroBreakdown {
                protein_pct: 30,
                carbs_pct: 50,
                fat_pct: 30,
            }
        );
        assert_eq!(goals.estimated_bmr(), 1500);
    }

    #[test]
    fn zero_calories_gives_zero_percent() {
        let goals = DailyGoals {
            daily_calories: 0,
            ..DailyGoals::default()
        };
        assert_eq!(goals.breakdown().protein_pct, 0);
        assert_eq!(goals.estimated_bmr(), 0);
    }

    #[test]
    fn negative_targets_are_invalid() {
        let goals = DailyGoals {
            daily_fat: -1,
            ..DailyGoals::default()
        };
        assert!(!goals.is_valid());
        assert!(DailyGoals::default().is_valid());
    }
}
