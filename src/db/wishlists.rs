use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::wishlist::WishlistItem;
use crate::snowflake;

fn row_to_item(row: sqlx::sqlite::SqliteRow) -> WishlistItem {
    WishlistItem {
        id: row.get("id"),
        member_id: row.get("member_id"),
        title: row.get("title"),
        note: row.get("note"),
        created_at: row.get("created_at"),
    }
}

const SELECT_ITEMS: &str = "SELECT id, member_id, title, note, created_at FROM wishlist_items";

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<WishlistItem>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_ITEMS} ORDER BY id ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_item).collect())
}

pub async fn list_for_member(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<Vec<WishlistItem>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_ITEMS} WHERE member_id = ? ORDER BY id ASC"))
        .bind(member_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_item).collect())
}

pub async fn get_item(pool: &SqlitePool, item_id: &str) -> Result<WishlistItem, AppError> {
    let row = sqlx::query(&format!("{SELECT_ITEMS} WHERE id = ?"))
        .bind(item_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown wishlist item".to_string()))?;
    Ok(row_to_item(row))
}

pub async fn create_item(
    pool: &SqlitePool,
    member_id: &str,
    title: &str,
    note: &str,
) -> Result<WishlistItem, AppError> {
    let id = snowflake::generate();
    sqlx::query("INSERT INTO wishlist_items (id, member_id, title, note) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(member_id)
        .bind(title)
        .bind(note)
        .execute(pool)
        .await?;

    get_item(pool, &id).await
}

/// Deletes exactly one item. Returns `false` if it did not exist.
pub async fn delete_item(pool: &SqlitePool, item_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM wishlist_items WHERE id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}
