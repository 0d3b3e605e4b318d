use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use crate::background::AdminNotice;
use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, CourtRepository, PaymentGateway, PendingPaymentRepository,
    TournamentRepository, UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub court_repo: Arc<dyn CourtRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_repo: Arc<dyn PendingPaymentRepository>,
    pub tournament_repo: Arc<dyn TournamentRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub notify_tx: UnboundedSender<AdminNotice>,
}

impl AppState {
    /// Enqueues an operator notice without ever failing the caller. The
    /// worker on the other end owns delivery and its errors.
    pub fn notify_admin(&self, notice: AdminNotice) {
        if self.notify_tx.send(notice).is_err() {
            tracing::warn!("Notification worker is gone, dropping admin notice");
        }
    }
}
