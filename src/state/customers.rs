use anyhow::Result;
use bson::{DateTime, doc};
use futures::stream::TryStreamExt;

use crate::models::{Customer, new_entity_id};

use super::AppState;

pub const SEARCH_RESULT_CAP: i64 = 10;

pub async fn create_customer(
    state: &AppState,
    name: &str,
    phone: &str,
    email: Option<String>,
    address: Option<String>,
) -> Result<Customer> {
    let customer = Customer {
        id: new_entity_id(),
        name: name.to_string(),
        phone: phone.to_string(),
        email,
        address,
        created_at: DateTime::now(),
    };
    state.customers.insert_one(&customer).await?;
    Ok(customer)
}

pub async fn list_customers(state: &AppState, skip: u64, limit: i64) -> Result<Vec<Customer>> {
    let mut cursor = state.customers.find(doc! {}).skip(skip).limit(limit).await?;
    let mut customers = Vec::new();
    while let Some(customer) = cursor.try_next().await? {
        customers.push(customer);
    }
    Ok(customers)
}

pub async fn get_customer_by_id(state: &AppState, id: &str) -> Result<Option<Customer>> {
    Ok(state.customers.find_one(doc! { "id": id }).await?)
}

/// Case-insensitive substring match over name, phone, and email.
pub async fn search_customers(state: &AppState, query: &str) -> Result<Vec<Customer>> {
    let pattern = regex_escape(query);
    let mut cursor = state
        .customers
        .find(doc! {
            "$or": [
                { "name": { "$regex": &pattern, "$options": "i" } },
                { "phone": { "$regex": &pattern, "$options": "i" } },
                { "email": { "$regex": &pattern, "$options": "i" } },
            ]
        })
        .limit(SEARCH_RESULT_CAP)
        .await?;
    let mut customers = Vec::new();
    while let Some(customer) = cursor.try_next().await? {
        customers.push(customer);
    }
    Ok(customers)
}

// The query text is user input, not a pattern; escape the regex
// metacharacters before handing it to the store.
fn regex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
