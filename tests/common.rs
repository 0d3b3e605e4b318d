use arena_backend::{
    api::router::create_router,
    background::start_notification_worker,
    config::Config,
    domain::models::court::Court,
    domain::models::payment::{CheckoutCreated, CheckoutRequest, GatewayPayment},
    domain::models::user::User,
    domain::ports::{NotificationService, PaymentGateway},
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_court_repo::SqliteCourtRepo,
        sqlite_payment_repo::SqlitePaymentRepo,
        sqlite_tournament_repo::SqliteTournamentRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockNotifier;

#[async_trait]
impl NotificationService for MockNotifier {
    async fn send(&self, _text: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Scriptable stand-in for the payment processor: tests prime `payments`
/// with the status the processor would report for a given payment id.
pub struct MockPaymentGateway {
    pub fail_checkout: AtomicBool,
    pub checkouts: Mutex<Vec<(String, i64)>>,
    payments: Mutex<HashMap<String, (String, Option<String>)>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            fail_checkout: AtomicBool::new(false),
            checkouts: Mutex::new(Vec::new()),
            payments: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_payment(&self, payment_id: &str, status: &str, external_reference: Option<&str>) {
        self.payments.lock().unwrap().insert(
            payment_id.to_string(),
            (status.to_string(), external_reference.map(str::to_string)),
        );
    }

    pub fn approve(&self, payment_id: &str, pending_id: &str) {
        self.set_payment(payment_id, "approved", Some(pending_id));
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutCreated, AppError> {
        if self.fail_checkout.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("Payment processor unreachable".to_string()));
        }

        self.checkouts.lock().unwrap().push((request.external_reference.clone(), request.amount));

        Ok(CheckoutCreated {
            preference_id: format!("pref-{}", request.external_reference),
            init_point: "https://payments.test/checkout".to_string(),
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, AppError> {
        Ok(self.payments.lock().unwrap().get(payment_id).map(|(status, external_reference)| {
            GatewayPayment {
                status: status.clone(),
                external_reference: external_reference.clone(),
            }
        }))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub gateway: Arc<MockPaymentGateway>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            mp_access_token: "test-token".to_string(),
            mp_api_url: "http://localhost".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            backend_url: "http://localhost:4000".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        };

        let gateway = Arc::new(MockPaymentGateway::new());
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            court_repo: Arc::new(SqliteCourtRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            tournament_repo: Arc::new(SqliteTournamentRepo::new(pool.clone())),
            payment_gateway: gateway.clone(),
            notify_tx,
        });

        tokio::spawn(async move {
            start_notification_worker(notify_rx, Arc::new(MockNotifier)).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            gateway,
        }
    }

    pub async fn create_court(&self, name: &str, sport: &str, court_type: &str, price_per_hour: i64) -> Court {
        let court = Court::new(name.to_string(), sport.to_string(), court_type.to_string(), price_per_hour);
        self.state.court_repo.create(&court).await.expect("Failed to create test court")
    }

    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> String {
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Register failed in test helper: status {}", response.status());
        }

        self.login(email, password).await
    }

    pub async fn create_admin(&self, email: &str, password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let mut user = User::new("Admin".to_string(), email.to_string(), password_hash);
        user.role = "ADMIN".to_string();
        self.state.user_repo.create(&user).await.expect("Failed to create admin");

        self.login(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        body_json["token"].as_str().expect("No token in body").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
