use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::AppState;

/// Claims carried by access tokens from the auth service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    pub sub: String,
}

/// The user a request acts for, taken from its bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user_id = decode_user_id(token, &state.decoding_key)?;
        Ok(CurrentUser(user_id))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(ApiError::AuthenticationFailed)?
        .to_str()
        .map_err(|_| ApiError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::InvalidToken)
}

fn decode_user_id(token: &str, key: &DecodingKey) -> Result<Uuid, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(token, key, &Validation::default())
        .map_err(|_| ApiError::InvalidToken)?;
    data.claims.sub.parse().map_err(|_| ApiError::InvalidToken)
}
