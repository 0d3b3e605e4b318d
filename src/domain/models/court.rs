use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const SPORTS: [&str; 3] = ["BEACH_TENNIS", "VOLEI", "FUTVOLEI"];
pub const COURT_TYPES: [&str; 2] = ["COBERTA", "DESCOBERTA"];

pub fn is_valid_sport(value: &str) -> bool {
    SPORTS.contains(&value)
}

pub fn is_valid_court_type(value: &str) -> bool {
    COURT_TYPES.contains(&value)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    pub sport: String,
    pub court_type: String,
    pub price_per_hour: i64,
    pub created_at: DateTime<Utc>,
}

impl Court {
    pub fn new(name: String, sport: String, court_type: String, price_per_hour: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            sport,
            court_type,
            price_per_hour,
            created_at: Utc::now(),
        }
    }
}
