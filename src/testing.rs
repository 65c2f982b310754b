//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ai::{GenerativeModel, Part};
use crate::entries::repo::EntryLog;
use crate::entries::repo_types::{EntryWithFood, FoodEntry, MealType, NewFoodEntry};
use crate::foods::repo::FoodCatalog;
use crate::foods::repo_types::{FoodItem, NewFoodItem};
use crate::goals::repo::GoalStore;
use crate::goals::repo_types::DailyGoals;
use crate::storage::StorageClient;

#[derive(Default)]
pub struct FakeCatalog {
    rows: Mutex<Vec<(Uuid, NewFoodItem)>>,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
    inserted: Mutex<Vec<Uuid>>,
    assign: Option<Uuid>,
    fail_lookup: bool,
    fail_insert: bool,
}

impl FakeCatalog {
    pub fn with_row(name: &str, calories: f64, id: Uuid) -> Self {
        let catalog = Self::default();
        catalog.rows.lock().unwrap().push((
            id,
            NewFoodItem {
                name: name.into(),
                calories_per_100g: calories,
                protein_per_100g: 0.0,
                carbs_per_100g: 0.0,
                fat_per_100g: 0.0,
                fiber_per_100g: None,
                sugar_per_100g: None,
                category: "Unknown".into(),
                brand: None,
            },
        ));
        catalog
    }

    /// Every insert returns `id` instead of a fresh v4.
    pub fn assigning(mut self, id: Uuid) -> Self {
        self.assign = Some(id);
        self
    }

    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    pub fn failing_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn inserted_ids(&self) -> Vec<Uuid> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FoodCatalog for FakeCatalog {
    async fn find_by_name_and_calories(
        &self,
        name: &str,
        calories_per_100g: f64,
    ) -> anyhow::Result<Option<Uuid>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            anyhow::bail!("connection reset");
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(_, r)| r.name == name && r.calories_per_100g == calories_per_100g)
            .map(|(id, _)| *id))
    }

    async fn insert(&self, item: &NewFoodItem) -> anyhow::Result<Uuid> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert {
            anyhow::bail!("insert rejected");
        }
        let id = self.assign.unwrap_or_else(Uuid::new_v4);
        self.rows.lock().unwrap().push((id, item.clone()));
        self.inserted.lock().unwrap().push(id);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(id, r)| FoodItem {
                id: *id,
                name: r.name.clone(),
                calories_per_100g: r.calories_per_100g,
                protein_per_100g: r.protein_per_100g,
                carbs_per_100g: r.carbs_per_100g,
                fat_per_100g: r.fat_per_100g,
                fiber_per_100g: r.fiber_per_100g,
                sugar_per_100g: r.sugar_per_100g,
                category: r.category.clone(),
                brand: r.brand.clone(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            }))
    }
}

/// Entry log keyed by owner. Inserted rows carry no joined food columns.
#[derive(Default)]
pub struct FakeEntries {
    inserted: Mutex<Vec<NewFoodEntry>>,
    rows: Mutex<Vec<(Uuid, EntryWithFood)>>,
    fail: bool,
}

impl FakeEntries {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<(Uuid, EntryWithFood)>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn inserted(&self) -> Vec<NewFoodEntry> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntryLog for FakeEntries {
    async fn insert(&self, entry: &NewFoodEntry) -> anyhow::Result<FoodEntry> {
        if self.fail {
            anyhow::bail!("insert rejected");
        }
        self.inserted.lock().unwrap().push(entry.clone());
        let saved = FoodEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            food_item_id: entry.food_item_id,
            quantity: entry.quantity,
            meal_type: entry.meal_type,
            logged_at: entry.logged_at,
            photo_url: entry.photo_url.clone(),
            notes: entry.notes.clone(),
        };
        self.rows.lock().unwrap().push((
            saved.user_id,
            EntryWithFood {
                id: saved.id,
                food_item_id: saved.food_item_id,
                quantity: saved.quantity,
                meal_type: saved.meal_type,
                logged_at: saved.logged_at,
                photo_url: saved.photo_url.clone(),
                notes: saved.notes.clone(),
                food_name: None,
                calories_per_100g: None,
                protein_per_100g: None,
                carbs_per_100g: None,
                fat_per_100g: None,
            },
        ));
        Ok(saved)
    }

    async fn list_with_food(
        &self,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<EntryWithFood>> {
        let mut found: Vec<EntryWithFood> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, e)| *owner == user_id && e.logged_at >= from && e.logged_at < to)
            .map(|(_, e)| e.clone())
            .collect();
        found.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(found)
    }
}

#[derive(Default)]
pub struct FakeGoals {
    goals: Mutex<HashMap<Uuid, DailyGoals>>,
}

#[async_trait]
impl GoalStore for FakeGoals {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<DailyGoals>> {
        Ok(self.goals.lock().unwrap().get(&user_id).copied())
    }

    async fn upsert(&self, user_id: Uuid, goals: &DailyGoals) -> anyhow::Result<DailyGoals> {
        self.goals.lock().unwrap().insert(user_id, *goals);
        Ok(*goals)
    }
}

#[derive(Clone)]
pub struct FakeStorage;

#[async_trait]
impl StorageClient for FakeStorage {
    async fn put_object(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
        Ok(())
    }
    async fn presign_get(&self, k: &str, _s: u64) -> anyhow::Result<String> {
        Ok(format!("https://fake.local/{}", k))
    }
}

/// Model that answers every prompt with a canned reply, or errors.
#[derive(Default)]
pub struct FakeModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, parts: Vec<Part>) -> anyhow::Result<String> {
        for part in parts {
            if let Part::Text(text) = part {
                self.prompts.lock().unwrap().push(text);
            }
        }
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("model unavailable"))
    }
}

pub fn entry_with_food(logged_at: OffsetDateTime, quantity: i32, calories: f64) -> EntryWithFood {
    EntryWithFood {
        id: Uuid::new_v4(),
        food_item_id: Uuid::new_v4(),
        quantity,
        meal_type: MealType::Lunch,
        logged_at,
        photo_url: None,
        notes: None,
        food_name: Some("Test Food".into()),
        calories_per_100g: Some(calories),
        protein_per_100g: Some(10.0),
        carbs_per_100g: Some(20.0),
        fat_per_100g: Some(5.0),
    }
}
