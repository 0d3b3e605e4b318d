use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use crate::domain::models::auth::{Claims, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::sync::Arc;
use tracing::Span;

pub struct AuthUser(pub CurrentUser);

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts.headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = decode_token(token, &app_state.config.jwt_secret)?;

        let user = CurrentUser::from(claims);
        Span::current().record("user_id", &user.id);

        Ok(AuthUser(user))
    }
}
