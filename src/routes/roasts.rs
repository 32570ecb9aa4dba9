use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::{Audience, ChangeEvent};
use crate::middleware::auth::AuthUser;
use crate::middleware::permissions::require_admin;
use crate::models::roast::{CreateRoast, ReceivedRoast, Roast};
use crate::state::AppState;

const MAX_MESSAGE_LEN: usize = 2000;

/// Sender and admins see the full roast; the recipient only gets the
/// anonymous copy.
fn publish_release(state: &AppState, roast: &Roast) {
    state.dispatcher.publish(
        Audience::MembersAndAdmins(vec![roast.sender_id.clone()]),
        ChangeEvent::RoastUpdate(roast.clone()),
    );
    state.dispatcher.publish(
        Audience::Members(vec![roast.recipient_id.clone()]),
        ChangeEvent::RoastReceived(roast.to_received()),
    );
}

pub async fn create_roast(
    state: State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRoast>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sender = db::members::get_member(&state.db, &auth.member_id).await?;
    let recipient_id = sender
        .roast_target
        .ok_or_else(|| AppError::BadRequest("no roast target assigned".to_string()))?;

    let message = input.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::BadRequest(format!(
            "message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }

    let roast = db::roasts::create_roast(&state.db, &sender.id, &recipient_id, message).await?;
    state.dispatcher.publish(
        Audience::MembersAndAdmins(vec![sender.id.clone()]),
        ChangeEvent::RoastCreate(roast.clone()),
    );

    Ok(Json(serde_json::json!({ "data": roast })))
}

pub async fn list_sent(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let roasts = db::roasts::list_sent(&state.db, &auth.member_id).await?;
    Ok(Json(serde_json::json!({ "data": roasts })))
}

pub async fn list_received(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let roasts: Vec<ReceivedRoast> = db::roasts::list_released_for(&state.db, &auth.member_id)
        .await?
        .iter()
        .map(|r| r.to_received())
        .collect();
    Ok(Json(serde_json::json!({ "data": roasts })))
}

pub async fn list_all(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let roasts = db::roasts::list_all(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": roasts })))
}

pub async fn release_roast(
    state: State<AppState>,
    Path(roast_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let (roast, changed) = db::roasts::release(&state.db, &roast_id).await?;
    if changed {
        tracing::info!(roast_id = %roast.id, "roast released");
        publish_release(&state, &roast);
    }
    Ok(Json(serde_json::json!({ "data": roast })))
}

pub async fn release_all(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let released = db::roasts::release_all(&state.db).await?;
    tracing::info!(count = released.len(), "released all pending roasts");
    for roast in &released {
        publish_release(&state, roast);
    }
    Ok(Json(serde_json::json!({ "data": released })))
}
