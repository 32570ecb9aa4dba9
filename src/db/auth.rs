use sqlx::SqlitePool;

use crate::error::AppError;
use crate::middleware::auth::{create_token_hash, generate_token};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Issues a bearer token for a member. Only the hash is stored.
pub async fn issue_token(
    pool: &SqlitePool,
    member_id: &str,
    ttl_days: i64,
) -> Result<String, AppError> {
    let token = generate_token();
    let token_hash = create_token_hash(&token);
    let expires_at = (chrono::Utc::now() + chrono::Duration::days(ttl_days))
        .format(TIMESTAMP_FORMAT)
        .to_string();

    sqlx::query("INSERT INTO member_tokens (token_hash, member_id, expires_at) VALUES (?, ?, ?)")
        .bind(&token_hash)
        .bind(member_id)
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolves a raw token to `(member_id, is_admin)` if it exists and has not expired.
pub async fn resolve_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<(String, bool)>, AppError> {
    let token_hash = create_token_hash(token);
    let now = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();

    let row = sqlx::query_as::<_, (String, bool)>(
        "SELECT t.member_id, m.is_admin FROM member_tokens t \
         JOIN members m ON t.member_id = m.id \
         WHERE t.token_hash = ? AND t.expires_at > ?",
    )
    .bind(&token_hash)
    .bind(&now)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn revoke_token(pool: &SqlitePool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM member_tokens WHERE token_hash = ?")
        .bind(create_token_hash(token))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn purge_expired_tokens(pool: &SqlitePool) -> Result<u64, AppError> {
    let now = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let result = sqlx::query("DELETE FROM member_tokens WHERE expires_at <= ?")
        .bind(&now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
