use axum::Json;

use crate::middleware::auth::AuthUser;
use crate::models::question::QUESTIONS;

pub async fn list_questions(_auth: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "data": QUESTIONS }))
}
