use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub court_id: String,
    pub sport: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub admin: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreferenceRequest {
    pub court_id: String,
    pub date: String,
    pub slots: Vec<String>,
    pub sport: String,
}

/// Mercado Pago delivers the payment id either in the JSON body
/// (`data.id`) or as a `data.id` query parameter.
#[derive(Deserialize)]
pub struct WebhookQuery {
    #[serde(rename = "data.id")]
    pub data_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTournamentRequest {
    pub name: String,
    pub description: Option<String>,
    pub sport: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub registration_end_date: Option<String>,
    pub has_gold: Option<bool>,
    pub has_silver: Option<bool>,
    pub has_bronze: Option<bool>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTournamentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub registration_end_date: Option<String>,
    pub has_gold: Option<bool>,
    pub has_silver: Option<bool>,
    pub has_bronze: Option<bool>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct TournamentRegistrationRequest {
    pub league: String,
}
