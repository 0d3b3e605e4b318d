use axum::{extract::State, response::IntoResponse, Json};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let courts = state.court_repo.list().await?;
    Ok(Json(courts))
}
