use anyhow::Result;
use bson::{DateTime, doc};

use crate::models::{User, UserRole, new_entity_id};

use super::AppState;

pub async fn find_user_by_username(state: &AppState, username: &str) -> Result<Option<User>> {
    Ok(state.users.find_one(doc! { "username": username }).await?)
}

/// Duplicate check used by registration: matches either field.
pub async fn find_user_by_username_or_email(
    state: &AppState,
    username: &str,
    email: &str,
) -> Result<Option<User>> {
    Ok(state
        .users
        .find_one(doc! { "$or": [ { "username": username }, { "email": email } ] })
        .await?)
}

pub async fn admin_exists(state: &AppState) -> Result<bool> {
    Ok(state
        .users
        .find_one(doc! { "role": UserRole::Admin.as_str() })
        .await?
        .is_some())
}

pub async fn create_user(
    state: &AppState,
    username: &str,
    email: &str,
    full_name: &str,
    role: UserRole,
    hashed_password: &str,
) -> Result<User> {
    let user = User {
        id: new_entity_id(),
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        role,
        is_active: true,
        created_at: DateTime::now(),
        hashed_password: hashed_password.to_string(),
    };
    state.users.insert_one(&user).await?;
    Ok(user)
}
