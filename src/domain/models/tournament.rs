use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const LEAGUES: [&str; 3] = ["GOLD", "SILVER", "BRONZE"];
pub const TOURNAMENT_STATUSES: [&str; 4] = ["UPCOMING", "ONGOING", "FINISHED", "CANCELED"];

pub fn is_valid_league(value: &str) -> bool {
    LEAGUES.contains(&value)
}

pub fn is_valid_tournament_status(value: &str) -> bool {
    TOURNAMENT_STATUSES.contains(&value)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sport: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub registration_end_date: Option<NaiveDate>,
    pub has_gold: bool,
    pub has_silver: bool,
    pub has_bronze: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewTournamentParams {
    pub name: String,
    pub description: Option<String>,
    pub sport: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub registration_end_date: Option<NaiveDate>,
    pub has_gold: bool,
    pub has_silver: bool,
    pub has_bronze: bool,
    pub status: String,
}

impl Tournament {
    pub fn new(params: NewTournamentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            sport: params.sport,
            start_date: params.start_date,
            end_date: params.end_date,
            registration_end_date: params.registration_end_date,
            has_gold: params.has_gold,
            has_silver: params.has_silver,
            has_bronze: params.has_bronze,
            status: params.status,
            created_at: Utc::now(),
        }
    }

    pub fn offers_league(&self, league: &str) -> bool {
        match league {
            "GOLD" => self.has_gold,
            "SILVER" => self.has_silver,
            "BRONZE" => self.has_bronze,
            _ => false,
        }
    }

    pub fn accepts_registrations(&self) -> bool {
        self.status == "UPCOMING" || self.status == "ONGOING"
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRegistration {
    pub id: String,
    pub user_id: String,
    pub tournament_id: String,
    pub league: String,
    pub created_at: DateTime<Utc>,
}

impl TournamentRegistration {
    pub fn new(user_id: String, tournament_id: String, league: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            tournament_id,
            league,
            created_at: Utc::now(),
        }
    }
}
