use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::api::extractors::auth::{bearer_token, decode_token};
use crate::domain::models::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// Optional identity: a missing, expired or malformed token makes the
/// request a guest instead of rejecting it.
pub struct MaybeAuthUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        match decode_token(token, &app_state.config.jwt_secret) {
            Ok(claims) => Ok(MaybeAuthUser(Some(CurrentUser::from(claims)))),
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}
