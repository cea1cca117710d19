// routes/plants.rs
// Catalog endpoints: creation is restricted to admin/manager, reads are open
// to any authenticated caller.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    auth::{AuthUser, authorize},
    error::ApiError,
    models::{Plant, UserRole},
    state::{AppState, create_plant, get_plant_by_id, list_plants, low_stock_plants},
};

use super::Pagination;

#[derive(Deserialize)]
pub struct PlantCreateRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub variants: Vec<String>,
    pub current_stock: i64,
    #[serde(default = "default_min_stock_threshold")]
    pub min_stock_threshold: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub investment: f64,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_min_stock_threshold() -> i64 {
    10
}

pub async fn plants_create(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlantCreateRequest>,
) -> Result<Json<Plant>, ApiError> {
    authorize(caller.role(), &[UserRole::Admin, UserRole::Manager])?;

    let plant = create_plant(
        &state,
        &body.name,
        &body.category,
        body.variants,
        body.current_stock,
        body.min_stock_threshold,
        body.cost_price,
        body.selling_price,
        body.investment,
        &body.location,
        body.description,
    )
    .await?;
    Ok(Json(plant))
}

pub async fn plants_index(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Plant>>, ApiError> {
    Ok(Json(list_plants(&state, page.skip, page.limit).await?))
}

pub async fn plants_low_stock(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Plant>>, ApiError> {
    Ok(Json(low_stock_plants(&state).await?))
}

pub async fn plants_show(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Plant>, ApiError> {
    let plant = get_plant_by_id(&state, &id)
        .await?
        .ok_or(ApiError::NotFound("Plant"))?;
    Ok(Json(plant))
}
