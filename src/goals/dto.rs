use serde::Serialize;

use super::repo_types::{DailyGoals, MacroBreakdown};

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    #[serde(flatten)]
    pub goals: DailyGoals,
    pub breakdown: MacroBreakdown,
    pub estimated_bmr: i64,
}

impl From<DailyGoals> for GoalsResponse {
    fn from(goals: DailyGoals) -> Self {
        Self {
            breakdown: goals.breakdown(),
            estimated_bmr: goals.estimated_bmr(),
            goals,
        }
    }
}
