use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{
    CreateTournamentRequest, TournamentRegistrationRequest, UpdateTournamentRequest,
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::CurrentUser;
use crate::domain::models::court::is_valid_sport;
use crate::domain::models::tournament::{
    is_valid_league, is_valid_tournament_status, NewTournamentParams, Tournament,
    TournamentRegistration,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

fn ensure_admin(user: &CurrentUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))
}

pub async fn list_tournaments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let tournaments = state.tournament_repo.list_public().await?;
    Ok(Json(tournaments))
}

pub async fn list_tournaments_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&current)?;
    let tournaments = state.tournament_repo.list_all().await?;
    Ok(Json(tournaments))
}

pub async fn create_tournament(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Json(payload): Json<CreateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&current)?;

    if payload.name.trim().len() < 3 {
        return Err(AppError::Validation("Name must be at least 3 characters".into()));
    }
    if !is_valid_sport(&payload.sport) {
        return Err(AppError::Validation("Invalid sport".into()));
    }

    let status = payload.status.unwrap_or_else(|| "UPCOMING".to_string());
    if !is_valid_tournament_status(&status) {
        return Err(AppError::Validation("Invalid tournament status".into()));
    }

    let tournament = Tournament::new(NewTournamentParams {
        name: payload.name,
        description: payload.description,
        sport: payload.sport,
        start_date: parse_date(&payload.start_date)?,
        end_date: payload.end_date.as_deref().map(parse_date).transpose()?,
        registration_end_date: payload.registration_end_date.as_deref().map(parse_date).transpose()?,
        has_gold: payload.has_gold.unwrap_or(false),
        has_silver: payload.has_silver.unwrap_or(false),
        has_bronze: payload.has_bronze.unwrap_or(false),
        status,
    });

    let created = state.tournament_repo.create(&tournament).await?;

    info!("Tournament created: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_tournament(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(tournament_id): Path<String>,
    Json(payload): Json<UpdateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&current)?;

    let mut tournament = state.tournament_repo.find_by_id(&tournament_id).await?
        .ok_or(AppError::NotFound("Tournament not found".into()))?;

    if let Some(name) = payload.name {
        if name.trim().len() < 3 {
            return Err(AppError::Validation("Name must be at least 3 characters".into()));
        }
        tournament.name = name;
    }
    if let Some(description) = payload.description {
        tournament.description = Some(description);
    }
    if let Some(sport) = payload.sport {
        if !is_valid_sport(&sport) {
            return Err(AppError::Validation("Invalid sport".into()));
        }
        tournament.sport = sport;
    }
    if let Some(status) = payload.status {
        if !is_valid_tournament_status(&status) {
            return Err(AppError::Validation("Invalid tournament status".into()));
        }
        tournament.status = status;
    }
    if let Some(ref start_date) = payload.start_date {
        tournament.start_date = parse_date(start_date)?;
    }
    if let Some(ref end_date) = payload.end_date {
        tournament.end_date = Some(parse_date(end_date)?);
    }
    if let Some(ref registration_end_date) = payload.registration_end_date {
        tournament.registration_end_date = Some(parse_date(registration_end_date)?);
    }
    if let Some(has_gold) = payload.has_gold {
        tournament.has_gold = has_gold;
    }
    if let Some(has_silver) = payload.has_silver {
        tournament.has_silver = has_silver;
    }
    if let Some(has_bronze) = payload.has_bronze {
        tournament.has_bronze = has_bronze;
    }

    let updated = state.tournament_repo.update(&tournament).await?;

    info!("Tournament updated: {}", updated.id);

    Ok(Json(updated))
}

pub async fn delete_tournament(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(tournament_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&current)?;

    state.tournament_repo.delete(&tournament_id).await?;

    info!("Tournament deleted: {}", tournament_id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_for_tournament(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(tournament_id): Path<String>,
    Json(payload): Json<TournamentRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_league(&payload.league) {
        return Err(AppError::Validation("Invalid league".into()));
    }

    let tournament = state.tournament_repo.find_by_id(&tournament_id).await?
        .ok_or(AppError::NotFound("Tournament not found".into()))?;

    if !tournament.offers_league(&payload.league) {
        return Err(AppError::Validation("This league is not available for this tournament".into()));
    }
    if !tournament.accepts_registrations() {
        return Err(AppError::Validation("This tournament is not open for registrations".into()));
    }
    if let Some(deadline) = tournament.registration_end_date
        && Utc::now().date_naive() > deadline
    {
        return Err(AppError::Validation("Registrations are closed for this tournament".into()));
    }

    let registration = TournamentRegistration::new(current.id, tournament.id, payload.league);

    let created = match state.tournament_repo.register(&registration).await {
        Ok(created) => created,
        Err(e) if e.is_unique_violation() => {
            return Err(AppError::Conflict("You are already registered in this league of this tournament".into()));
        }
        Err(e) => return Err(e),
    };

    info!("Tournament registration: user {} in {} ({})", created.user_id, created.tournament_id, created.league);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_registrations(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let registrations = state.tournament_repo.list_registrations_by_user(&current.id).await?;
    Ok(Json(registrations))
}
