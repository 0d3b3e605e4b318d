use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;
use tracing::log::LevelFilter;

use crate::background::AdminNotice;
use crate::config::Config;
use crate::domain::models::court::Court;
use crate::domain::ports::CourtRepository;
use crate::infra::payment::mercado_pago::MercadoPagoGateway;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_court_repo::PostgresCourtRepo,
    postgres_payment_repo::PostgresPaymentRepo, postgres_tournament_repo::PostgresTournamentRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_court_repo::SqliteCourtRepo,
    sqlite_payment_repo::SqlitePaymentRepo, sqlite_tournament_repo::SqliteTournamentRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> (AppState, UnboundedReceiver<AdminNotice>) {
    let database_url = &config.database_url;

    let payment_gateway = Arc::new(MercadoPagoGateway::new(
        config.mp_api_url.clone(),
        config.mp_access_token.clone(),
    ));

    let (notify_tx, notify_rx) = mpsc::unbounded_channel();

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let court_repo: Arc<dyn CourtRepository> = Arc::new(PostgresCourtRepo::new(pool.clone()));
        seed_default_courts(&court_repo).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            court_repo,
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            payment_repo: Arc::new(PostgresPaymentRepo::new(pool.clone())),
            tournament_repo: Arc::new(PostgresTournamentRepo::new(pool.clone())),
            payment_gateway,
            notify_tx,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let court_repo: Arc<dyn CourtRepository> = Arc::new(SqliteCourtRepo::new(pool.clone()));
        seed_default_courts(&court_repo).await;

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            court_repo,
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            tournament_repo: Arc::new(SqliteTournamentRepo::new(pool.clone())),
            payment_gateway,
            notify_tx,
        }
    };

    (state, notify_rx)
}

/// First-boot seed: the arena's six courts, covered at 80/h and uncovered
/// at 50/h. Skipped whenever any court already exists.
async fn seed_default_courts(repo: &Arc<dyn CourtRepository>) {
    let count = repo.count().await.expect("Failed to count courts");
    if count > 0 {
        return;
    }

    info!("Seeding default courts...");

    let courts = [
        ("Quadra JJ", "BEACH_TENNIS", "COBERTA", 80),
        ("Quadra 2", "VOLEI", "COBERTA", 80),
        ("Quadra 3", "FUTVOLEI", "COBERTA", 80),
        ("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50),
        ("Quadra 5", "VOLEI", "DESCOBERTA", 50),
        ("Quadra 6", "FUTVOLEI", "DESCOBERTA", 50),
    ];

    for (name, sport, court_type, price) in courts {
        let court = Court::new(name.to_string(), sport.to_string(), court_type.to_string(), price);
        repo.create(&court).await.expect("Failed to seed court");
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
