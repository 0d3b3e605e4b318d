use crate::domain::{models::payment::PendingPayment, ports::PendingPaymentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingPaymentRepository for SqlitePaymentRepo {
    async fn create(&self, payment: &PendingPayment) -> Result<PendingPayment, AppError> {
        sqlx::query_as::<_, PendingPayment>(
            "INSERT INTO pending_payments (id, user_id, court_id, sport, date, slots, total_amount, status, preference_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&payment.id).bind(&payment.user_id).bind(&payment.court_id).bind(&payment.sport)
            .bind(payment.date).bind(&payment.slots).bind(payment.total_amount)
            .bind(&payment.status).bind(&payment.preference_id).bind(payment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<PendingPayment>, AppError> {
        sqlx::query_as::<_, PendingPayment>("SELECT * FROM pending_payments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn set_preference_id(&self, id: &str, preference_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE pending_payments SET preference_id = ? WHERE id = ?")
            .bind(preference_id).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
    async fn mark_approved(&self, id: &str) -> Result<bool, AppError> {
        // Guarded transition: a terminal row never moves again.
        let result = sqlx::query("UPDATE pending_payments SET status = 'APPROVED' WHERE id = ? AND status = 'PENDING'")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
    async fn mark_rejected(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE pending_payments SET status = 'REJECTED' WHERE id = ? AND status = 'PENDING'")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
