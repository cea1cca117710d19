// analytics.rs
// On-demand dashboard rollups; nothing is cached.

use anyhow::Result;
use bson::{Bson, Document, doc};
use futures::stream::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::models::Bill;

use super::AppState;

pub const RECENT_BILLS_COUNT: i64 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_sales: f64,
    pub total_plants: u64,
    pub low_stock_alerts: u64,
    pub recent_bills: Vec<Bill>,
}

pub async fn dashboard(state: &AppState) -> Result<Dashboard> {
    // Pending bills are not yet sales; everything else counts.
    let pipeline = vec![
        doc! { "$match": { "status": { "$ne": "pending" } } },
        doc! { "$group": { "_id": null, "total": { "$sum": "$total_amount" } } },
    ];
    let mut cursor = state.bills.aggregate(pipeline).await?;
    let total_sales = match cursor.try_next().await? {
        Some(group) => sum_as_f64(&group),
        None => 0.0,
    };

    let total_plants = state.plants.count_documents(doc! {}).await?;
    let low_stock_alerts = state
        .plants
        .count_documents(doc! { "$expr": { "$lte": ["$current_stock", "$min_stock_threshold"] } })
        .await?;

    let recent_bills = super::list_bills(state, 0, RECENT_BILLS_COUNT).await?;

    Ok(Dashboard {
        total_sales,
        total_plants,
        low_stock_alerts,
        recent_bills,
    })
}

// $sum yields a double for double inputs but an int for an empty/int-only
// group; accept both.
fn sum_as_f64(group: &Document) -> f64 {
    match group.get("total") {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}
