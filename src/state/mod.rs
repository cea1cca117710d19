// state module: AppState, initialization, and re-exports of submodules.

use anyhow::Result;
use mongodb::{Client, Collection};
use std::env;

use crate::auth::AuthConfig;
use crate::models::{Bill, Counter, Customer, Plant, Quotation, User};

mod analytics;
mod billing;
mod customers;
mod plants;
mod users;

pub use analytics::*;
pub use billing::*;
pub use customers::*;
pub use plants::*;
pub use users::*;

pub const BILL_NUMBER_PREFIX: &str = "SKN-";
pub const QUOTATION_NUMBER_PREFIX: &str = "SKN-Q-";
pub const DEFAULT_QUOTATION_VALID_DAYS: i64 = 30;
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct AppState {
    pub users: Collection<User>,
    pub plants: Collection<Plant>,
    pub customers: Collection<Customer>,
    pub bills: Collection<Bill>,
    pub quotations: Collection<Quotation>,
    pub counters: Collection<Counter>,
    pub auth: AuthConfig,
}

pub async fn init_state() -> Result<AppState> {
    let uri = env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = env::var("MONGODB_DB").unwrap_or_else(|_| "nursery".to_string());

    let client = Client::with_uri_str(uri).await?;
    let db = client.database(&db_name);

    Ok(AppState {
        users: db.collection::<User>("users"),
        plants: db.collection::<Plant>("plants"),
        customers: db.collection::<Customer>("customers"),
        bills: db.collection::<Bill>("bills"),
        quotations: db.collection::<Quotation>("quotations"),
        counters: db.collection::<Counter>("counters"),
        auth: AuthConfig::from_env(),
    })
}
