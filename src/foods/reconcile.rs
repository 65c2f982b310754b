use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::identifier::{is_canonical, FoodId};
use super::repo::FoodCatalog;
use super::repo_types::FoodCandidate;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to search for food in catalog")]
    Lookup(#[source] anyhow::Error),
    #[error("failed to save food item to catalog")]
    Insert(#[source] anyhow::Error),
    #[error("resolved food id {0} is not a valid catalog id")]
    InvalidId(Uuid),
}

/// Resolve a candidate to exactly one catalog id.
///
/// Persisted candidates return immediately. Everything else is matched by
/// exact `name` + `calories_per_100g`, and inserted when no row matches. The
/// insert is not undone if a later step fails.
pub async fn resolve_food_id(
    catalog: &dyn FoodCatalog,
    candidate: &FoodCandidate,
) -> Result<Uuid, ReconcileError> {
    let resolved = match &candidate.id {
        FoodId::Persisted(id) => {
            debug!(food_id = %id, "candidate already in catalog");
            *id
        }
        FoodId::Transient(source, _) => {
            debug!(candidate = %candidate.id, ?source, name = %candidate.name, "reconciling candidate");
            let existing = catalog
                .find_by_name_and_calories(&candidate.name, candidate.calories_per_100g)
                .await
                .map_err(|e| {
                    error!(error = %e, name = %candidate.name, "catalog lookup failed");
                    ReconcileError::Lookup(e)
                })?;
            match existing {
                Some(id) => {
                    debug!(food_id = %id, "reusing catalog row");
                    id
                }
                None => {
                    let id = catalog.insert(&candidate.to_new_item()).await.map_err(|e| {
                        error!(error = %e, name = %candidate.name, "catalog insert failed");
                        ReconcileError::Insert(e)
                    })?;
                    info!(food_id = %id, name = %candidate.name, "food item added to catalog");
                    id
                }
            }
        }
    };

    if !is_canonical(&resolved.hyphenated().to_string()) {
        error!(food_id = %resolved, candidate = %candidate.id, "resolved id failed validation");
        return Err(ReconcileError::InvalidId(resolved));
    }
    Ok(resolved)
}
