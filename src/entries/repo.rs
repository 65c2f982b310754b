use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{EntryWithFood, FoodEntry, NewFoodEntry};

#[async_trait]
pub trait EntryLog: Send + Sync {
    async fn insert(&self, entry: &NewFoodEntry) -> anyhow::Result<FoodEntry>;

    /// Entries with `from <= logged_at < to`, newest first.
    async fn list_with_food(
        &self,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<EntryWithFood>>;
}

#[derive(Clone)]
pub struct PgEntries {
    db: PgPool,
}

impl PgEntries {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryLog for PgEntries {
    async fn insert(&self, entry: &NewFoodEntry) -> anyhow::Result<FoodEntry> {
        let row = sqlx::query_as::<_, FoodEntry>(
            r#"
            INSERT INTO food_entries (user_id, food_item_id, quantity, meal_type, logged_at, photo_url, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, food_item_id, quantity, meal_type, logged_at, photo_url, notes
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.food_item_id)
        .bind(entry.quantity)
        .bind(entry.meal_type)
        .bind(entry.logged_at)
        .bind(&entry.photo_url)
        .bind(&entry.notes)
        .fetch_one(&self.db)
        .await
        .context("insert food entry")?;
        Ok(row)
    }

    async fn list_with_food(
        &self,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<EntryWithFood>> {
        let rows = sqlx::query_as::<_, EntryWithFood>(
            r#"
            SELECT e.id, e.food_item_id, e.quantity, e.meal_type, e.logged_at, e.photo_url, e.notes,
                   f.name AS food_name, f.calories_per_100g, f.protein_per_100g,
                   f.carbs_per_100g, f.fat_per_100g
              FROM food_entries e
              LEFT JOIN food_items f ON f.id = e.food_item_id
             WHERE e.user_id = $1 AND e.logged_at >= $2 AND e.logged_at < $3
             ORDER BY e.logged_at DESC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .context("list entries with food")?;
        Ok(rows)
    }
}
