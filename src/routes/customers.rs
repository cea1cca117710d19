// routes/customers.rs
// Party endpoints: any authenticated caller may create and read customers.
// Duplicates are allowed on purpose.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::Customer,
    state::{AppState, create_customer, list_customers, search_customers},
};

use super::Pagination;

#[derive(Deserialize)]
pub struct CustomerCreateRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub async fn customers_create(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CustomerCreateRequest>,
) -> Result<Json<Customer>, ApiError> {
    let customer = create_customer(&state, &body.name, &body.phone, body.email, body.address).await?;
    Ok(Json(customer))
}

pub async fn customers_index(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(list_customers(&state, page.skip, page.limit).await?))
}

pub async fn customers_search(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(search_customers(&state, &params.q).await?))
}
