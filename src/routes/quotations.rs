// routes/quotations.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{BillItem, Quotation},
    state::{AppState, DEFAULT_QUOTATION_VALID_DAYS, create_quotation, list_quotations},
};

use super::Pagination;

#[derive(Deserialize)]
pub struct QuotationCreateRequest {
    pub customer_id: String,
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default = "default_valid_days")]
    pub valid_days: i64,
}

fn default_valid_days() -> i64 {
    DEFAULT_QUOTATION_VALID_DAYS
}

pub async fn quotations_create(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuotationCreateRequest>,
) -> Result<Json<Quotation>, ApiError> {
    let quotation = create_quotation(
        &state,
        &body.customer_id,
        body.items,
        body.tax,
        body.discount,
        body.valid_days,
        caller.user(),
    )
    .await?
    .ok_or(ApiError::NotFound("Customer"))?;
    Ok(Json(quotation))
}

pub async fn quotations_index(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Quotation>>, ApiError> {
    Ok(Json(list_quotations(&state, page.skip, page.limit).await?))
}
