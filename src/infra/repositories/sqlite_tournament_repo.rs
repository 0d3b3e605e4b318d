use crate::domain::{
    models::tournament::{Tournament, TournamentRegistration},
    ports::TournamentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTournamentRepo {
    pool: SqlitePool,
}

impl SqliteTournamentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TournamentRepository for SqliteTournamentRepo {
    async fn create(&self, tournament: &Tournament) -> Result<Tournament, AppError> {
        sqlx::query_as::<_, Tournament>(
            "INSERT INTO tournaments (id, name, description, sport, start_date, end_date, registration_end_date, has_gold, has_silver, has_bronze, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&tournament.id).bind(&tournament.name).bind(&tournament.description).bind(&tournament.sport)
            .bind(tournament.start_date).bind(tournament.end_date).bind(tournament.registration_end_date)
            .bind(tournament.has_gold).bind(tournament.has_silver).bind(tournament.has_bronze)
            .bind(&tournament.status).bind(tournament.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Tournament>, AppError> {
        sqlx::query_as::<_, Tournament>("SELECT * FROM tournaments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_public(&self) -> Result<Vec<Tournament>, AppError> {
        sqlx::query_as::<_, Tournament>("SELECT * FROM tournaments ORDER BY start_date ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_all(&self) -> Result<Vec<Tournament>, AppError> {
        sqlx::query_as::<_, Tournament>("SELECT * FROM tournaments ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, tournament: &Tournament) -> Result<Tournament, AppError> {
        sqlx::query_as::<_, Tournament>(
            "UPDATE tournaments SET name=?, description=?, sport=?, start_date=?, end_date=?, registration_end_date=?, has_gold=?, has_silver=?, has_bronze=?, status=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&tournament.name).bind(&tournament.description).bind(&tournament.sport)
            .bind(tournament.start_date).bind(tournament.end_date).bind(tournament.registration_end_date)
            .bind(tournament.has_gold).bind(tournament.has_silver).bind(tournament.has_bronze)
            .bind(&tournament.status).bind(&tournament.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tournaments WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tournament not found".into()));
        }
        Ok(())
    }
    async fn register(&self, registration: &TournamentRegistration) -> Result<TournamentRegistration, AppError> {
        sqlx::query_as::<_, TournamentRegistration>(
            "INSERT INTO tournament_registrations (id, user_id, tournament_id, league, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&registration.id).bind(&registration.user_id).bind(&registration.tournament_id)
            .bind(&registration.league).bind(registration.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_registrations_by_user(&self, user_id: &str) -> Result<Vec<TournamentRegistration>, AppError> {
        sqlx::query_as::<_, TournamentRegistration>(
            "SELECT * FROM tournament_registrations WHERE user_id = ? ORDER BY created_at DESC"
        ).bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
