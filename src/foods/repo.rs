use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{FoodItem, NewFoodItem};

/// Persisted set of reusable food nutrient records.
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    /// Row whose name and calories match exactly, if any.
    async fn find_by_name_and_calories(
        &self,
        name: &str,
        calories_per_100g: f64,
    ) -> anyhow::Result<Option<Uuid>>;

    /// Insert a row and return the identifier the database assigned.
    async fn insert(&self, item: &NewFoodItem) -> anyhow::Result<Uuid>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
}

#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodCatalog for PgCatalog {
    async fn find_by_name_and_calories(
        &self,
        name: &str,
        calories_per_100g: f64,
    ) -> anyhow::Result<Option<Uuid>> {
        let row = sqlx::query_as::<_, (Uuid,)>(
            r#"
            SELECT id
              FROM food_items
             WHERE name = $1 AND calories_per_100g = $2
             ORDER BY created_at ASC
             LIMIT 1
            "#,
        )
        .bind(name)
        .bind(calories_per_100g)
        .fetch_optional(&self.db)
        .await
        .context("find food by name and calories")?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert(&self, item: &NewFoodItem) -> anyhow::Result<Uuid> {
        let (id,) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO food_items (name, calories_per_100g, protein_per_100g, carbs_per_100g,
                                    fat_per_100g, fiber_per_100g, sugar_per_100g, category, brand)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&item.name)
        .bind(item.calories_per_100g)
        .bind(item.protein_per_100g)
        .bind(item.carbs_per_100g)
        .bind(item.fat_per_100g)
        .bind(item.fiber_per_100g)
        .bind(item.sugar_per_100g)
        .bind(&item.category)
        .bind(&item.brand)
        .fetch_one(&self.db)
        .await
        .context("insert food item")?;
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let item = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, name, calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g,
                   fiber_per_100g, sugar_per_100g, category, brand, created_at
              FROM food_items
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get food item")?;
        Ok(item)
    }
}
