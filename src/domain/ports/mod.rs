use crate::domain::models::{
    booking::Booking,
    court::Court,
    payment::{CheckoutCreated, CheckoutRequest, GatewayPayment, PendingPayment},
    tournament::{Tournament, TournamentRegistration},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, court: &Court) -> Result<Court, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError>;
    async fn list(&self) -> Result<Vec<Court>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// ACTIVE bookings only: the availability view of a court day.
    async fn list_active_by_court_date(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// All statuses; a user's history includes cancellations.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Booking>, AppError>;
    async fn cancel(&self, id: &str) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait PendingPaymentRepository: Send + Sync {
    async fn create(&self, payment: &PendingPayment) -> Result<PendingPayment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PendingPayment>, AppError>;
    async fn set_preference_id(&self, id: &str, preference_id: &str) -> Result<(), AppError>;
    /// Guarded transitions: only a PENDING row moves; returns whether this
    /// call performed the transition. Terminal states are never left.
    async fn mark_approved(&self, id: &str) -> Result<bool, AppError>;
    async fn mark_rejected(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TournamentRepository: Send + Sync {
    async fn create(&self, tournament: &Tournament) -> Result<Tournament, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tournament>, AppError>;
    async fn list_public(&self) -> Result<Vec<Tournament>, AppError>;
    async fn list_all(&self) -> Result<Vec<Tournament>, AppError>;
    async fn update(&self, tournament: &Tournament) -> Result<Tournament, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn register(&self, registration: &TournamentRegistration) -> Result<TournamentRegistration, AppError>;
    async fn list_registrations_by_user(&self, user_id: &str) -> Result<Vec<TournamentRegistration>, AppError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutCreated, AppError>;
    /// Queries the processor for a payment. `Ok(None)` means the processor
    /// answered but does not recognize the id (a business no-op for the
    /// webhook); `Err(Upstream)` is reserved for transport failures, which
    /// the webhook surfaces so the processor retries delivery.
    async fn get_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, AppError>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), AppError>;
}
