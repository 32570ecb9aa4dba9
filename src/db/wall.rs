use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::wall::WallMessage;
use crate::snowflake;

fn row_to_message(row: sqlx::sqlite::SqliteRow) -> WallMessage {
    WallMessage {
        id: row.get("id"),
        author_id: row.get("author_id"),
        body: row.get("body"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
    }
}

const SELECT_MESSAGES: &str = "SELECT w.id, w.author_id, w.body, w.created_at, \
     (SELECT COUNT(*) FROM wall_likes l WHERE l.message_id = w.id) AS likes \
     FROM wall_messages w";

pub async fn list_messages(pool: &SqlitePool, limit: i64) -> Result<Vec<WallMessage>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_MESSAGES} ORDER BY w.id DESC LIMIT ?"))
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_message).collect())
}

pub async fn get_message(pool: &SqlitePool, message_id: &str) -> Result<WallMessage, AppError> {
    let row = sqlx::query(&format!("{SELECT_MESSAGES} WHERE w.id = ?"))
        .bind(message_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown wall message".to_string()))?;
    Ok(row_to_message(row))
}

pub async fn create_message(
    pool: &SqlitePool,
    author_id: &str,
    body: &str,
) -> Result<WallMessage, AppError> {
    let id = snowflake::generate();
    sqlx::query("INSERT INTO wall_messages (id, author_id, body) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(author_id)
        .bind(body)
        .execute(pool)
        .await?;

    get_message(pool, &id).await
}

/// Records a like. Liking twice counts once.
pub async fn like_message(
    pool: &SqlitePool,
    message_id: &str,
    member_id: &str,
) -> Result<WallMessage, AppError> {
    // Resolve first so an unknown id is a 404 rather than a foreign key error.
    get_message(pool, message_id).await?;

    sqlx::query("INSERT OR IGNORE INTO wall_likes (message_id, member_id) VALUES (?, ?)")
        .bind(message_id)
        .bind(member_id)
        .execute(pool)
        .await?;

    get_message(pool, message_id).await
}
