use serde_json::json;

use crate::badges;
use crate::db;
use crate::error::AppError;
use crate::models::member::Member;
use crate::models::question::QUESTIONS;
use crate::models::roast::ReceivedRoast;
use crate::routes::wall::DEFAULT_WALL_LIMIT;
use crate::state::AppState;

/// Everything a client needs to render the game without further requests.
pub async fn build_ready(
    state: &AppState,
    session_id: &str,
    member_id: &str,
    is_admin: bool,
) -> Result<serde_json::Value, AppError> {
    let pool = &state.db;

    let me = db::members::get_member(pool, member_id).await?;
    let members: Vec<Member> = db::members::list_members(pool)
        .await?
        .iter()
        .map(|row| row.to_public())
        .collect();
    let wishlists = db::wishlists::list_all(pool).await?;
    let answers = if is_admin {
        db::answers::list_all(pool).await?
    } else {
        db::answers::list_for_voter(pool, member_id).await?
    };
    let winners = badges::load_winners(pool).await?;
    let roasts_sent = db::roasts::list_sent(pool, member_id).await?;
    // Admins moderate every roast; members never see this key.
    let all_roasts = if is_admin {
        Some(db::roasts::list_all(pool).await?)
    } else {
        None
    };
    let roasts_received: Vec<ReceivedRoast> = db::roasts::list_released_for(pool, member_id)
        .await?
        .iter()
        .map(|r| r.to_received())
        .collect();
    let wall = db::wall::list_messages(pool, DEFAULT_WALL_LIMIT).await?;

    let mut ready = json!({
        "session_id": session_id,
        "member": me.to_self(),
        "members": members,
        "questions": QUESTIONS,
        "wishlists": wishlists,
        "answers": answers,
        "badges": winners,
        "roasts_sent": roasts_sent,
        "roasts_received": roasts_received,
        "wall": wall,
        "online_member_ids": state.dispatcher.online_member_ids(),
        "server_version": env!("CARGO_PKG_VERSION")
    });
    if let Some(all_roasts) = all_roasts {
        ready["roasts"] = json!(all_roasts);
    }
    Ok(ready)
}
