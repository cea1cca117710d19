// routes/bills.rs
// Bill endpoints: creation runs the transaction engine, the pending queue
// and the approval transition are admin-only.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{
    auth::{AuthUser, authorize},
    error::ApiError,
    models::{Bill, BillItem, PaymentMethod, UserRole},
    state::{AppState, approve_bill, create_bill, list_bills, pending_bills},
};

use super::Pagination;

#[derive(Deserialize)]
pub struct BillCreateRequest {
    pub customer_id: String,
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub payment_method: PaymentMethod,
}

pub async fn bills_create(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<BillCreateRequest>,
) -> Result<Json<Bill>, ApiError> {
    let bill = create_bill(
        &state,
        &body.customer_id,
        body.items,
        body.tax,
        body.discount,
        body.payment_method,
        caller.user(),
    )
    .await?
    .ok_or(ApiError::NotFound("Customer"))?;
    Ok(Json(bill))
}

pub async fn bills_index(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    Ok(Json(list_bills(&state, page.skip, page.limit).await?))
}

pub async fn bills_pending(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Bill>>, ApiError> {
    authorize(caller.role(), &[UserRole::Admin])?;
    Ok(Json(pending_bills(&state).await?))
}

pub async fn bills_approve(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(caller.role(), &[UserRole::Admin])?;

    if !approve_bill(&state, &id, caller.user_id()).await? {
        return Err(ApiError::NotFound("Bill"));
    }
    Ok(Json(serde_json::json!({ "message": "Bill approved successfully" })))
}
