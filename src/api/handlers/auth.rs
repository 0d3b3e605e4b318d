use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::dtos::responses::{TokenResponse, UserProfile};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::User;
use crate::error::AppError;
use crate::state::AppState;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Invalid e-mail address".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("E-mail already registered".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(payload.name, payload.email, password_hash);
    let created = state.user_repo.create(&user).await?;

    info!("User registered: {}", created.id);

    Ok((StatusCode::CREATED, Json(UserProfile::from(created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(7)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("JWT encoding failed: {}", e);
        AppError::Internal
    })?;

    info!("User logged in: {}", user.id);

    Ok(Json(TokenResponse { token }))
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&current.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(UserProfile::from(user)))
}
