// routes/analytics.rs

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    auth::AuthUser,
    error::ApiError,
    state::{AppState, Dashboard, dashboard},
};

pub async fn analytics_dashboard(
    _caller: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    Ok(Json(dashboard(&state).await?))
}
