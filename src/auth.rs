// auth.rs
// Bearer-token middleware to protect routes, the extractor that hands the
// resolved caller to handlers, and the role gate used by restricted
// operations.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use futures::future::BoxFuture;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{User, UserRole},
    state::{AppState, find_user_by_username},
};

/// Token claims: subject is the username, expiry is enforced on decode.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Signing configuration, read from the environment once at startup.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        AuthConfig {
            secret: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            token_ttl_minutes: 30,
        }
    }
}

pub fn issue_token(username: &str, config: &AuthConfig) -> Result<String, ApiError> {
    let exp = Utc::now() + Duration::minutes(config.token_ttl_minutes);
    let claims = Claims {
        sub: username.to_string(),
        exp: exp.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(err.into()))
}

pub fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthenticated("Invalid authentication credentials"))
}

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|err| ApiError::Internal(err.into()))
}

pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

/// Authorization predicate: the caller's role must be in the allowed set.
/// Evaluated at the start of each role-restricted operation, after the
/// middleware has established identity.
pub fn authorize(caller_role: UserRole, allowed_roles: &[UserRole]) -> Result<(), ApiError> {
    if allowed_roles.contains(&caller_role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Middleware for the protected route group: validates the bearer token and
/// resolves the subject to a live user record.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())
        .ok_or(ApiError::Unauthenticated("Not authenticated"))?;

    let claims = validate_token(&token, &state.auth)?;
    let user = find_user_by_username(&state, &claims.sub)
        .await?
        .ok_or(ApiError::Unauthenticated("User not found"))?;

    request.extensions_mut().insert(AuthUser(Arc::new(user)));
    Ok(next.run(request).await)
}

/// The resolved caller, inserted by `require_auth` and pulled out of request
/// extensions by handlers.
#[derive(Clone)]
pub struct AuthUser(pub Arc<User>);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn user_id(&self) -> &str {
        &self.0.id
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

#[allow(refining_impl_trait)]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> BoxFuture<'static, Result<Self, Self::Rejection>> {
        let caller = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated("Not authenticated"));
        Box::pin(async move { caller })
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_owned())
}
