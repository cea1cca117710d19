// billing.rs
// Transaction engine for Bills and Quotations: totals, sequential document
// numbers, initial workflow status, and the pending -> approved transition.

use anyhow::{Context, Result};
use bson::{DateTime, doc};
use chrono::{Duration, Utc};
use futures::stream::TryStreamExt;
use mongodb::options::ReturnDocument;

use crate::models::{
    Bill, BillItem, BillStatus, PaymentMethod, Quotation, QuotationStatus, User, UserRole,
    new_entity_id,
};

use super::{AppState, BILL_NUMBER_PREFIX, QUOTATION_NUMBER_PREFIX};

pub const PENDING_BILLS_CAP: i64 = 100;

/// Subtotal and grand total. Line totals are taken at face value; tax and
/// discount are applied unchecked, so the result can go negative.
pub fn compute_totals(items: &[BillItem], tax: f64, discount: f64) -> (f64, f64) {
    let subtotal: f64 = items.iter().map(|item| item.total_price).sum();
    (subtotal, subtotal + tax - discount)
}

pub fn format_document_number(prefix: &str, seq: i64) -> String {
    format!("{prefix}{seq:06}")
}

/// Cashier bills enter the approval queue; admin and manager bills skip it.
pub fn initial_bill_status(creator_role: UserRole) -> BillStatus {
    match creator_role {
        UserRole::Cashier => BillStatus::Pending,
        UserRole::Admin | UserRole::Manager => BillStatus::Approved,
    }
}

/// Atomic per-kind sequence. `$inc` on the counters collection with upsert
/// makes concurrent creations take distinct numbers.
async fn next_sequence(state: &AppState, kind: &str) -> Result<i64> {
    let counter = state
        .counters
        .find_one_and_update(doc! { "_id": kind }, doc! { "$inc": { "seq": 1 } })
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?
        .context("counter upsert returned no document")?;
    Ok(counter.seq)
}

/// Creates a Bill for an existing customer; `Ok(None)` when the customer is
/// absent. Stock is not decremented here.
pub async fn create_bill(
    state: &AppState,
    customer_id: &str,
    items: Vec<BillItem>,
    tax: f64,
    discount: f64,
    payment_method: PaymentMethod,
    creator: &User,
) -> Result<Option<Bill>> {
    let Some(customer) = super::get_customer_by_id(state, customer_id).await? else {
        return Ok(None);
    };

    let (subtotal, total_amount) = compute_totals(&items, tax, discount);
    let seq = next_sequence(state, "bills").await?;

    let bill = Bill {
        id: new_entity_id(),
        bill_number: format_document_number(BILL_NUMBER_PREFIX, seq),
        customer_id: customer.id,
        customer_name: customer.name,
        items,
        subtotal,
        tax,
        discount,
        total_amount,
        payment_method,
        status: initial_bill_status(creator.role),
        created_by: creator.id.clone(),
        approved_by: None,
        created_at: DateTime::now(),
    };
    state.bills.insert_one(&bill).await?;
    Ok(Some(bill))
}

pub async fn list_bills(state: &AppState, skip: u64, limit: i64) -> Result<Vec<Bill>> {
    let mut cursor = state
        .bills
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(limit)
        .await?;
    let mut bills = Vec::new();
    while let Some(bill) = cursor.try_next().await? {
        bills.push(bill);
    }
    Ok(bills)
}

pub async fn pending_bills(state: &AppState) -> Result<Vec<Bill>> {
    let mut cursor = state
        .bills
        .find(doc! { "status": BillStatus::Pending.as_str() })
        .sort(doc! { "created_at": -1 })
        .limit(PENDING_BILLS_CAP)
        .await?;
    let mut bills = Vec::new();
    while let Some(bill) = cursor.try_next().await? {
        bills.push(bill);
    }
    Ok(bills)
}

pub async fn get_bill_by_id(state: &AppState, id: &str) -> Result<Option<Bill>> {
    Ok(state.bills.find_one(doc! { "id": id }).await?)
}

/// Sets status to approved and records the approver. Returns false when no
/// bill matched. Re-approving simply re-sets the same fields.
pub async fn approve_bill(state: &AppState, bill_id: &str, approver_id: &str) -> Result<bool> {
    let result = state
        .bills
        .update_one(
            doc! { "id": bill_id },
            doc! { "$set": {
                "status": BillStatus::Approved.as_str(),
                "approved_by": approver_id,
            } },
        )
        .await?;
    if result.matched_count > 0 {
        tracing::info!(bill_id, approver_id, "bill approved");
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Same engine as `create_bill`, with a validity deadline instead of the
/// approval workflow: quotations always start out active.
pub async fn create_quotation(
    state: &AppState,
    customer_id: &str,
    items: Vec<BillItem>,
    tax: f64,
    discount: f64,
    valid_days: i64,
    creator: &User,
) -> Result<Option<Quotation>> {
    let Some(customer) = super::get_customer_by_id(state, customer_id).await? else {
        return Ok(None);
    };

    let (subtotal, total_amount) = compute_totals(&items, tax, discount);
    let seq = next_sequence(state, "quotations").await?;
    let valid_until = DateTime::from_chrono(Utc::now() + Duration::days(valid_days));

    let quotation = Quotation {
        id: new_entity_id(),
        quotation_number: format_document_number(QUOTATION_NUMBER_PREFIX, seq),
        customer_id: customer.id,
        customer_name: customer.name,
        items,
        subtotal,
        tax,
        discount,
        total_amount,
        valid_until,
        status: QuotationStatus::Active,
        created_by: creator.id.clone(),
        created_at: DateTime::now(),
    };
    state.quotations.insert_one(&quotation).await?;
    Ok(Some(quotation))
}

pub async fn list_quotations(state: &AppState, skip: u64, limit: i64) -> Result<Vec<Quotation>> {
    let mut cursor = state
        .quotations
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .skip(skip)
        .limit(limit)
        .await?;
    let mut quotations = Vec::new();
    while let Some(quotation) = cursor.try_next().await? {
        quotations.push(quotation);
    }
    Ok(quotations)
}
