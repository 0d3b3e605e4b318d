use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{auth, booking, court, health, payment, tournament};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/me", get(auth::get_me))

        // Courts
        .route("/api/courts", get(court::list_courts))

        // Bookings
        .route("/api/bookings", get(booking::list_bookings).post(booking::create_booking))
        .route("/api/bookings/{booking_id}", delete(booking::cancel_booking))

        // Payments
        .route("/api/payments/create-preference", post(payment::create_preference))
        .route("/api/payments/webhook", post(payment::webhook))

        // Tournaments
        .route("/api/tournaments", get(tournament::list_tournaments).post(tournament::create_tournament))
        .route("/api/tournaments/admin", get(tournament::list_tournaments_admin))
        .route("/api/tournaments/{tournament_id}", put(tournament::update_tournament).delete(tournament::delete_tournament))
        .route("/api/tournaments/{tournament_id}/register", post(tournament::register_for_tournament))
        .route("/api/tournaments/registrations/me", get(tournament::my_registrations))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
