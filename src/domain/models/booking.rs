use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

pub const BOOKING_ACTIVE: &str = "ACTIVE";
pub const BOOKING_CANCELED: &str = "CANCELED";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub court_id: String,
    pub sport: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub court_id: String,
    pub sport: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            court_id: params.court_id,
            sport: params.sport,
            date: params.date,
            start_time: params.start,
            end_time: params.end,
            status: BOOKING_ACTIVE.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BOOKING_ACTIVE
    }
}
