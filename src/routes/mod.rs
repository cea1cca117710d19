// routes/mod.rs
// Router assembly and public re-exports of all route handlers.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::auth::require_auth;
use crate::state::{AppState, DEFAULT_PAGE_LIMIT};

pub mod analytics;
pub mod auth;
pub mod bills;
pub mod customers;
pub mod plants;
pub mod quotations;

pub use analytics::analytics_dashboard;
pub use auth::{init_admin, login, me, register};
pub use bills::{bills_approve, bills_create, bills_index, bills_pending};
pub use customers::{customers_create, customers_index, customers_search};
pub use plants::{plants_create, plants_index, plants_low_stock, plants_show};
pub use quotations::{quotations_create, quotations_index};

/// skip/limit query parameters shared by the list endpoints.
#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Everything lives under /api; login and the admin bootstrap are the only
/// unauthenticated endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/plants", post(plants_create).get(plants_index))
        .route("/plants/low-stock", get(plants_low_stock))
        .route("/plants/{id}", get(plants_show))
        .route("/customers", post(customers_create).get(customers_index))
        .route("/customers/search", get(customers_search))
        .route("/bills", post(bills_create).get(bills_index))
        .route("/bills/pending", get(bills_pending))
        .route("/bills/{id}/approve", put(bills_approve))
        .route("/quotations", post(quotations_create).get(quotations_index))
        .route("/analytics/dashboard", get(analytics_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/init-admin", post(init_admin))
        .merge(protected);

    Router::new().nest("/api", api).with_state(state)
}
