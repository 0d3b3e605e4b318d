use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub mp_access_token: String,
    pub mp_api_url: String,
    pub frontend_url: String,
    pub backend_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "4000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            mp_access_token: env::var("MP_ACCESS_TOKEN").expect("MP_ACCESS_TOKEN must be set"),
            mp_api_url: env::var("MP_API_URL").unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            backend_url: env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:4000".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok(),
        }
    }
}
