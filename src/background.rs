use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};
use crate::domain::ports::NotificationService;

/// Operator-facing notices produced by the request handlers. Delivery is
/// best-effort: a notice that cannot be sent is logged and dropped, never
/// bounced back into the request that produced it.
#[derive(Debug)]
pub enum AdminNotice {
    BookingCreated {
        user_name: String,
        user_email: String,
        court_name: String,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    /// A paid slot was lost to a concurrent booking between payment
    /// initiation and approval. Needs manual reconciliation (refund or
    /// rebooking) by the operator.
    SlotLost {
        pending_payment_id: String,
        court_name: String,
        date: NaiveDate,
        slot: String,
    },
}

impl AdminNotice {
    pub fn render(&self) -> String {
        match self {
            AdminNotice::BookingCreated { user_name, user_email, court_name, date, start_time, end_time } => {
                [
                    "📅 *New booking at A Beach Arena*".to_string(),
                    String::new(),
                    format!("*Customer:* {} ({})", user_name, user_email),
                    format!("*Court:* {}", court_name),
                    format!("*Date:* {}", date.format("%Y-%m-%d")),
                    format!("*Time:* {} - {}", start_time.format("%H:%M"), end_time.format("%H:%M")),
                ].join("\n")
            }
            AdminNotice::SlotLost { pending_payment_id, court_name, date, slot } => {
                [
                    "⚠️ *Paid slot lost to a concurrent booking*".to_string(),
                    String::new(),
                    format!("*Pending payment:* {}", pending_payment_id),
                    format!("*Court:* {}", court_name),
                    format!("*Date:* {}", date.format("%Y-%m-%d")),
                    format!("*Slot:* {}", slot),
                    String::new(),
                    "The customer paid for this slot but it was booked in the meantime. Reconcile manually.".to_string(),
                ].join("\n")
            }
        }
    }
}

pub async fn start_notification_worker(
    mut rx: UnboundedReceiver<AdminNotice>,
    notifier: Arc<dyn NotificationService>,
) {
    info!("Starting notification worker...");

    while let Some(notice) = rx.recv().await {
        if let Err(e) = notifier.send(&notice.render()).await {
            error!("Failed to deliver admin notice: {}", e);
        }
    }

    info!("Notification channel closed, worker stopping");
}
