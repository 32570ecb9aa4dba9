use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::{Audience, ChangeEvent};
use crate::middleware::auth::AuthUser;
use crate::middleware::permissions::require_owner_or_admin;
use crate::models::wishlist::CreateWishlistItem;
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_NOTE_LEN: usize = 1000;

pub async fn list_wishlists(
    state: State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let items = db::wishlists::list_all(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": items })))
}

pub async fn list_member_wishlist(
    state: State<AppState>,
    Path(member_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    // 404 for unknown members rather than an empty list.
    db::members::get_member(&state.db, &member_id).await?;
    let items = db::wishlists::list_for_member(&state.db, &member_id).await?;
    Ok(Json(serde_json::json!({ "data": items })))
}

pub async fn create_item(
    state: State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateWishlistItem>,
) -> Result<Json<serde_json::Value>, AppError> {
    let title = input.title.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::BadRequest(format!(
            "title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    let note = input.note.as_deref().unwrap_or("").trim();
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(AppError::BadRequest(format!(
            "note must be at most {MAX_NOTE_LEN} characters"
        )));
    }

    let item = db::wishlists::create_item(&state.db, &auth.member_id, title, note).await?;
    state
        .dispatcher
        .publish(Audience::Everyone, ChangeEvent::WishlistCreate(item.clone()));

    Ok(Json(serde_json::json!({ "data": item })))
}

pub async fn delete_item(
    state: State<AppState>,
    Path(item_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let item = db::wishlists::get_item(&state.db, &item_id).await?;
    require_owner_or_admin(&auth, &item.member_id)?;

    if !db::wishlists::delete_item(&state.db, &item.id).await? {
        return Err(AppError::NotFound("unknown wishlist item".to_string()));
    }
    state.dispatcher.publish(
        Audience::Everyone,
        ChangeEvent::WishlistDelete {
            id: item.id.clone(),
            member_id: item.member_id.clone(),
        },
    );

    Ok(Json(serde_json::json!({ "data": null })))
}
