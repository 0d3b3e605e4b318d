use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use crate::api::dtos::requests::{CreatePreferenceRequest, WebhookQuery};
use crate::api::dtos::responses::PreferenceCreatedResponse;
use crate::api::extractors::auth::AuthUser;
use crate::background::AdminNotice;
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::models::court::is_valid_sport;
use crate::domain::models::payment::{
    CheckoutRequest, NewPendingPaymentParams, PendingPayment, PAYMENT_PENDING,
};
use crate::domain::services::availability::{find_conflicts, parse_hhmm, SlotInterval};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn create_preference(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Json(payload): Json<CreatePreferenceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_sport(&payload.sport) {
        return Err(AppError::Validation("Invalid sport".into()));
    }
    if payload.slots.is_empty() {
        return Err(AppError::Validation("At least one slot is required".into()));
    }

    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let mut candidates = Vec::with_capacity(payload.slots.len());
    for slot in &payload.slots {
        candidates.push(SlotInterval::slot_starting(parse_hhmm(slot)?));
    }

    let court = state.court_repo.find_by_id(&payload.court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    let total_amount = court.price_per_hour * payload.slots.len() as i64;
    if total_amount <= 0 {
        return Err(AppError::Validation("Invalid amount".into()));
    }

    // Advisory check only: it narrows the race window and produces a friendly
    // error up front. The authoritative check happens again when the payment
    // is approved and the bookings are actually created.
    let existing = state.booking_repo.list_active_by_court_date(&court.id, date).await?;
    let conflicts = find_conflicts(&candidates, &existing);

    if let Some(&first) = conflicts.first() {
        return Err(AppError::Conflict(format!("Slot {} is already booked.", payload.slots[first])));
    }

    let pending = state.payment_repo.create(&PendingPayment::new(NewPendingPaymentParams {
        user_id: current.id.clone(),
        court_id: court.id.clone(),
        sport: payload.sport.clone(),
        date,
        slots: payload.slots.clone(),
        total_amount,
    })).await?;

    let checkout = CheckoutRequest {
        external_reference: pending.id.clone(),
        title: format!("A Beach Arena - {}", court.name),
        description: format!("{} hour(s) - {} - {}", payload.slots.len(), payload.sport, payload.date),
        amount: total_amount,
        payer_email: current.email.clone(),
        success_url: format!("{}/booking/success", state.config.frontend_url),
        failure_url: format!("{}/booking/failure", state.config.frontend_url),
        pending_url: format!("{}/booking/pending", state.config.frontend_url),
        notification_url: format!("{}/api/payments/webhook", state.config.backend_url),
    };

    let created = match state.payment_gateway.create_checkout(&checkout).await {
        Ok(created) => created,
        Err(e) => {
            // The customer was never redirected; the order is dead on arrival.
            if let Err(mark_err) = state.payment_repo.mark_rejected(&pending.id).await {
                error!("Failed to mark pending payment {} rejected: {}", pending.id, mark_err);
            }
            return Err(e);
        }
    };

    state.payment_repo.set_preference_id(&pending.id, &created.preference_id).await?;

    info!("Payment initiated: {} for {} slot(s), total {}", pending.id, payload.slots.len(), total_amount);

    Ok(Json(PreferenceCreatedResponse {
        init_point: created.init_point,
        pending_id: pending.id,
    }))
}

/// Processor callback. Transport receipt and business outcome are kept
/// separate: every business outcome (unknown payment, not approved, unknown
/// or already-settled reference) acknowledges with 200 so the processor
/// stops retrying, and each ignored path is logged. Only a transport-level
/// failure reaching the processor propagates, which signals retry.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // The processor posts JSON but also repeats the id as a query
    // parameter; accept either and tolerate non-JSON bodies.
    let body_id = serde_json::from_slice::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("data"))
        .and_then(|data| data.get("id"))
        .and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    let Some(payment_id) = body_id.or(query.data_id) else {
        info!("Webhook without payment id, ignoring");
        return Ok("OK");
    };

    let Some(payment) = state.payment_gateway.get_payment(&payment_id).await? else {
        warn!("Webhook for unknown payment {}, ignoring", payment_id);
        return Ok("OK");
    };

    if payment.status != "approved" {
        info!("Webhook for payment {} with status {}, ignoring", payment_id, payment.status);
        return Ok("OK");
    }

    let Some(pending_id) = payment.external_reference else {
        warn!("Approved payment {} carries no external reference, ignoring", payment_id);
        return Ok("OK");
    };

    let Some(pending) = state.payment_repo.find_by_id(&pending_id).await? else {
        warn!("Approved payment {} references unknown order {}, ignoring", payment_id, pending_id);
        return Ok("OK");
    };

    // Duplicate delivery lands here: the order already reached a terminal
    // state and stays there.
    if pending.status != PAYMENT_PENDING {
        info!("Order {} already {}, ignoring duplicate webhook", pending.id, pending.status);
        return Ok("OK");
    }

    materialize_bookings(&state, &pending).await?;

    if state.payment_repo.mark_approved(&pending.id).await? {
        info!("Payment approved: order {} settled", pending.id);
    }

    Ok("OK")
}

/// Creates one ACTIVE booking per paid slot. A slot that was booked by
/// someone else since initiation is skipped and reported to the operator;
/// the remaining slots still materialize (partial fulfillment).
async fn materialize_bookings(
    state: &Arc<AppState>,
    pending: &PendingPayment,
) -> Result<(), AppError> {
    let court_name = state.court_repo.find_by_id(&pending.court_id).await?
        .map(|c| c.name)
        .unwrap_or_else(|| pending.court_id.clone());

    let user = state.user_repo.find_by_id(&pending.user_id).await?;

    for slot in pending.slot_list() {
        let start = match parse_hhmm(&slot) {
            Ok(start) => start,
            Err(_) => {
                error!("Order {} holds malformed slot {:?}, skipping", pending.id, slot);
                continue;
            }
        };
        let end = start + Duration::hours(1);

        let candidate = SlotInterval::slot_starting(start);
        let existing = state.booking_repo.list_active_by_court_date(&pending.court_id, pending.date).await?;

        // A retried delivery that died after creating some bookings resumes
        // here: the payer already holds the slot, nothing to do.
        if existing.iter().any(|b| b.user_id == pending.user_id && b.start_time == start) {
            continue;
        }

        if !find_conflicts(&[candidate], &existing).is_empty() {
            report_lost_slot(state, pending, &court_name, &slot);
            continue;
        }

        let booking = Booking::new(NewBookingParams {
            user_id: pending.user_id.clone(),
            court_id: pending.court_id.clone(),
            sport: pending.sport.clone(),
            date: pending.date,
            start,
            end,
        });

        let created = match state.booking_repo.create(&booking).await {
            Ok(created) => created,
            Err(e) if e.is_unique_violation() => {
                // Lost the race between the check above and the insert.
                report_lost_slot(state, pending, &court_name, &slot);
                continue;
            }
            Err(e) => return Err(e),
        };

        info!("Booking {} materialized from order {}", created.id, pending.id);

        if let Some(ref user) = user {
            state.notify_admin(AdminNotice::BookingCreated {
                user_name: user.name.clone(),
                user_email: user.email.clone(),
                court_name: court_name.clone(),
                date: created.date,
                start_time: created.start_time,
                end_time: created.end_time,
            });
        }
    }

    Ok(())
}

fn report_lost_slot(state: &Arc<AppState>, pending: &PendingPayment, court_name: &str, slot: &str) {
    warn!("Order {}: paid slot {} was booked in the meantime, skipping", pending.id, slot);

    state.notify_admin(AdminNotice::SlotLost {
        pending_payment_id: pending.id.clone(),
        court_name: court_name.to_string(),
        date: pending.date,
        slot: slot.to_string(),
    });
}
