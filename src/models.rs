// models.rs
// Domain records stored in MongoDB collections. Entity ids are uuid-v4
// strings kept in an `id` field, separate from Mongo's own `_id`.

use bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff roles for authorization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Cashier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Cashier => "cashier",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Online,
    Both,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Approved,
    Completed,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Approved => "approved",
            BillStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    Active,
    Expired,
    Converted,
}

/// User document as stored, credential hash included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime,
    pub hashed_password: String,
}

/// Outward projection of a User; the hash never crosses the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub category: String,
    pub variants: Vec<String>,
    pub current_stock: i64,
    pub min_stock_threshold: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub investment: f64,
    pub location: String,
    pub description: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime,
}

/// Line item embedded in Bills and Quotations. `total_price` is supplied by
/// the caller and stored as-is; the engine never recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub plant_id: String,
    pub plant_name: String,
    pub variant: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Finalized sales document. Items, totals, and the customer-name snapshot
/// are frozen at creation; only status/approved_by mutate afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub bill_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<BillItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: BillStatus,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub created_at: DateTime,
}

/// Priced offer with a validity deadline. `valid_until` is informational;
/// no read path expires quotations against the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    pub quotation_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<BillItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total_amount: f64,
    pub valid_until: DateTime,
    pub status: QuotationStatus,
    pub created_by: String,
    pub created_at: DateTime,
}

/// Per-kind document-number sequence, bumped atomically with `$inc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub kind: String,
    pub seq: i64,
}

pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}
