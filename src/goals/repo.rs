use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::DailyGoals;

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<DailyGoals>>;
    /// Insert or replace the user's single goal row.
    async fn upsert(&self, user_id: Uuid, goals: &DailyGoals) -> anyhow::Result<DailyGoals>;
}

#[derive(Clone)]
pub struct PgGoals {
    db: PgPool,
}

impl PgGoals {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GoalStore for PgGoals {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<DailyGoals>> {
        let goals = sqlx::query_as::<_, DailyGoals>(
            r#"
            SELECT daily_calories, daily_protein, daily_carbs, daily_fat
              FROM daily_goals
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("get daily goals")?;
        Ok(goals)
    }

    async fn upsert(&self, user_id: Uuid, goals: &DailyGoals) -> anyhow::Result<DailyGoals> {
        let saved = sqlx::query_as::<_, DailyGoals>(
            r#"
            INSERT INTO daily_goals (user_id, daily_calories, daily_protein, daily_carbs, daily_fat)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
               SET daily_calories = EXCLUDED.daily_calories,
                   daily_protein  = EXCLUDED.daily_protein,
                   daily_carbs    = EXCLUDED.daily_carbs,
                   daily_fat      = EXCLUDED.daily_fat,
                   updated_at     = now()
            RETURNING daily_calories, daily_protein, daily_carbs, daily_fat
            "#,
        )
        .bind(user_id)
        .bind(goals.daily_calories)
        .bind(goals.daily_protein)
        .bind(goals.daily_carbs)
        .bind(goals.daily_fat)
        .fetch_one(&self.db)
        .await
        .context("upsert daily goals")?;
        Ok(saved)
    }
}

/// Stored goals, or the defaults when the user never saved any.
pub async fn goals_or_default(store: &dyn GoalStore, user_id: Uuid) -> anyhow::Result<DailyGoals> {
    Ok(store.get(user_id).await?.unwrap_or_default())
}
