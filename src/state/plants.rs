use anyhow::Result;
use bson::{DateTime, doc};
use futures::stream::TryStreamExt;

use crate::models::{Plant, new_entity_id};

use super::AppState;

pub const LOW_STOCK_RESULT_CAP: i64 = 1000;

pub async fn create_plant(
    state: &AppState,
    name: &str,
    category: &str,
    variants: Vec<String>,
    current_stock: i64,
    min_stock_threshold: i64,
    cost_price: f64,
    selling_price: f64,
    investment: f64,
    location: &str,
    description: Option<String>,
) -> Result<Plant> {
    let now = DateTime::now();
    let plant = Plant {
        id: new_entity_id(),
        name: name.to_string(),
        category: category.to_string(),
        variants,
        current_stock,
        min_stock_threshold,
        cost_price,
        selling_price,
        investment,
        location: location.to_string(),
        description,
        created_at: now,
        updated_at: now,
    };
    state.plants.insert_one(&plant).await?;
    Ok(plant)
}

pub async fn list_plants(state: &AppState, skip: u64, limit: i64) -> Result<Vec<Plant>> {
    let mut cursor = state.plants.find(doc! {}).skip(skip).limit(limit).await?;
    let mut plants = Vec::new();
    while let Some(plant) = cursor.try_next().await? {
        plants.push(plant);
    }
    Ok(plants)
}

/// A plant is low on stock when current_stock <= min_stock_threshold; the
/// comparison is between two fields of the same document, hence `$expr`.
pub async fn low_stock_plants(state: &AppState) -> Result<Vec<Plant>> {
    let mut cursor = state
        .plants
        .find(doc! { "$expr": { "$lte": ["$current_stock", "$min_stock_threshold"] } })
        .limit(LOW_STOCK_RESULT_CAP)
        .await?;
    let mut plants = Vec::new();
    while let Some(plant) = cursor.try_next().await? {
        plants.push(plant);
    }
    Ok(plants)
}

pub async fn get_plant_by_id(state: &AppState, id: &str) -> Result<Option<Plant>> {
    Ok(state.plants.find_one(doc! { "id": id }).await?)
}
