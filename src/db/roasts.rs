use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::roast::Roast;
use crate::snowflake;

fn row_to_roast(row: sqlx::sqlite::SqliteRow) -> Roast {
    Roast {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        recipient_id: row.get("recipient_id"),
        message: row.get("message"),
        released: row.get("released"),
        released_at: row.get("released_at"),
        created_at: row.get("created_at"),
    }
}

const SELECT_ROASTS: &str =
    "SELECT id, sender_id, recipient_id, message, released, released_at, created_at FROM roasts";

pub async fn get_roast(pool: &SqlitePool, roast_id: &str) -> Result<Roast, AppError> {
    let row = sqlx::query(&format!("{SELECT_ROASTS} WHERE id = ?"))
        .bind(roast_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown roast".to_string()))?;
    Ok(row_to_roast(row))
}

pub async fn create_roast(
    pool: &SqlitePool,
    sender_id: &str,
    recipient_id: &str,
    message: &str,
) -> Result<Roast, AppError> {
    let id = snowflake::generate();
    sqlx::query("INSERT INTO roasts (id, sender_id, recipient_id, message) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(sender_id)
        .bind(recipient_id)
        .bind(message)
        .execute(pool)
        .await?;

    get_roast(pool, &id).await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Roast>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_ROASTS} ORDER BY id ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_roast).collect())
}

pub async fn list_sent(pool: &SqlitePool, sender_id: &str) -> Result<Vec<Roast>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_ROASTS} WHERE sender_id = ? ORDER BY id ASC"))
        .bind(sender_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_roast).collect())
}

/// Released roasts addressed to a member. Unreleased ones never leave here.
pub async fn list_released_for(
    pool: &SqlitePool,
    recipient_id: &str,
) -> Result<Vec<Roast>, AppError> {
    let rows = sqlx::query(&format!(
        "{SELECT_ROASTS} WHERE recipient_id = ? AND released = 1 ORDER BY id ASC"
    ))
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_roast).collect())
}

/// Marks one roast released. Returns the roast and whether this call changed it.
pub async fn release(pool: &SqlitePool, roast_id: &str) -> Result<(Roast, bool), AppError> {
    let result = sqlx::query(
        "UPDATE roasts SET released = 1, released_at = datetime('now') \
         WHERE id = ? AND released = 0",
    )
    .bind(roast_id)
    .execute(pool)
    .await?;

    let roast = get_roast(pool, roast_id).await?;
    Ok((roast, result.rows_affected() == 1))
}

/// Releases every pending roast in one statement and returns the ones that changed.
pub async fn release_all(pool: &SqlitePool) -> Result<Vec<Roast>, AppError> {
    let rows = sqlx::query(
        "UPDATE roasts SET released = 1, released_at = datetime('now') WHERE released = 0 \
         RETURNING id, sender_id, recipient_id, message, released, released_at, created_at",
    )
    .fetch_all(pool)
    .await?;

    // RETURNING order is unspecified.
    let mut released: Vec<Roast> = rows.into_iter().map(row_to_roast).collect();
    released.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(released)
}
