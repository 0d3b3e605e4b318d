use crate::domain::{models::court::Court, ports::CourtRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresCourtRepo {
    pool: PgPool,
}

impl PostgresCourtRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourtRepository for PostgresCourtRepo {
    async fn create(&self, court: &Court) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            "INSERT INTO courts (id, name, sport, court_type, price_per_hour, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&court.id).bind(&court.name).bind(&court.sport)
            .bind(&court.court_type).bind(court.price_per_hour).bind(court.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>("SELECT * FROM courts ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM courts").fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
