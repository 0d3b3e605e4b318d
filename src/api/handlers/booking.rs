use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{BookingListQuery, CreateBookingRequest};
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::background::AdminNotice;
use crate::domain::models::booking::{Booking, NewBookingParams, BOOKING_CANCELED};
use crate::domain::models::court::is_valid_sport;
use crate::domain::services::availability::{find_conflicts, SlotInterval};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::info;

const ADMIN_LISTING_LIMIT: i64 = 100;

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Admin mode: most recent bookings across all courts, any status.
    if query.admin.as_deref() == Some("true")
        && let Some(ref current) = user
        && current.is_admin()
    {
        let bookings = state.booking_repo.list_recent(ADMIN_LISTING_LIMIT).await?;
        return Ok(Json(bookings));
    }

    // Court + date mode: the availability view, ACTIVE rows only.
    if let (Some(court_id), Some(date_str)) = (&query.court_id, &query.date) {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date format".into()))?;

        let bookings = state.booking_repo.list_active_by_court_date(court_id, date).await?;
        return Ok(Json(bookings));
    }

    // No filters: the caller's own history, cancellations included.
    let current = user.ok_or(AppError::Validation(
        "courtId and date are required, or authenticate to list your own bookings".into(),
    ))?;

    let bookings = state.booking_repo.list_by_user(&current.id).await?;
    Ok(Json(bookings))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_sport(&payload.sport) {
        return Err(AppError::Validation("Invalid sport".into()));
    }

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    let start = NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:mm)".into()))?;
    let end = NaiveTime::parse_from_str(&payload.end_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:mm)".into()))?;

    if end <= start {
        return Err(AppError::Validation("End time must be after start time".into()));
    }

    let court = state.court_repo.find_by_id(&payload.court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    // Friendly pre-check before the insert. The unique index on ACTIVE
    // (court, date, start) still decides under concurrent requests.
    let existing = state.booking_repo.list_active_by_court_date(&court.id, date).await?;
    let candidate = SlotInterval::new(start, end);

    if !find_conflicts(&[candidate], &existing).is_empty() {
        return Err(AppError::Conflict("Some of the selected times are already booked. Try different times.".into()));
    }

    let booking = Booking::new(NewBookingParams {
        user_id: current.id.clone(),
        court_id: court.id.clone(),
        sport: payload.sport,
        date,
        start,
        end,
    });

    let created = state.booking_repo.create(&booking).await?;

    info!("Booking confirmed: {} on court {}", created.id, court.name);

    state.notify_admin(AdminNotice::BookingCreated {
        user_name: current.name,
        user_email: current.email,
        court_name: court.name,
        date: created.date,
        start_time: created.start_time,
        end_time: created.end_time,
    });

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.user_id != current.id && !current.is_admin() {
        return Err(AppError::Forbidden("You cannot cancel this booking".into()));
    }

    // Idempotent: re-canceling an already-canceled booking is a no-op.
    if booking.status == BOOKING_CANCELED {
        return Ok(Json(booking));
    }

    let canceled = state.booking_repo.cancel(&booking.id).await?;

    info!("Booking canceled: {} by user {}", canceled.id, current.id);

    Ok(Json(canceled))
}
