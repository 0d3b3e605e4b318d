use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        // The partial unique index on (court_id, date, start_time) for ACTIVE
        // rows backstops the in-process availability check under races.
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, court_id, sport, date, start_time, end_time, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.court_id).bind(&booking.sport)
            .bind(booking.date).bind(booking.start_time).bind(booking.end_time)
            .bind(&booking.status).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_by_court_date(&self, court_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE court_id = ? AND date = ? AND status = 'ACTIVE' ORDER BY start_time ASC"
        ).bind(court_id).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = ? ORDER BY date ASC, start_time ASC"
        ).bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_recent(&self, limit: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY date DESC, start_time DESC LIMIT ?"
        ).bind(limit).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn cancel(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'CANCELED' WHERE id = ? RETURNING *"
        ).bind(id).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
