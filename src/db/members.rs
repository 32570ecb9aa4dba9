use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::member::{normalize_access_code, MemberRow};

fn row_to_member(row: sqlx::sqlite::SqliteRow) -> MemberRow {
    MemberRow {
        id: row.get("id"),
        display_name: row.get("display_name"),
        avatar: row.get("avatar"),
        access_code: row.get("access_code"),
        password_hash: row.get("password_hash"),
        is_admin: row.get("is_admin"),
        santa_for: row.get("santa_for"),
        roast_target: row.get("roast_target"),
        votes_locked: row.get("votes_locked"),
        created_at: row.get("created_at"),
    }
}

const SELECT_MEMBERS: &str = "SELECT id, display_name, avatar, access_code, password_hash, is_admin, santa_for, roast_target, votes_locked, created_at FROM members";

pub async fn get_member(pool: &SqlitePool, member_id: &str) -> Result<MemberRow, AppError> {
    let row = sqlx::query(&format!("{SELECT_MEMBERS} WHERE id = ?"))
        .bind(member_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown member".to_string()))?;

    Ok(row_to_member(row))
}

pub async fn find_by_access_code(
    pool: &SqlitePool,
    access_code: &str,
) -> Result<Option<MemberRow>, AppError> {
    let row = sqlx::query(&format!("{SELECT_MEMBERS} WHERE access_code = ?"))
        .bind(normalize_access_code(access_code))
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_member))
}

pub async fn list_members(pool: &SqlitePool) -> Result<Vec<MemberRow>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_MEMBERS} ORDER BY display_name ASC, id ASC"))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_member).collect())
}

pub async fn count_members(pool: &SqlitePool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create_member(
    pool: &SqlitePool,
    id: &str,
    display_name: &str,
    access_code: &str,
    is_admin: bool,
) -> Result<MemberRow, AppError> {
    let result = sqlx::query(
        "INSERT INTO members (id, display_name, access_code, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(display_name)
    .bind(normalize_access_code(access_code))
    .bind(is_admin)
    .execute(pool)
    .await;

    match result {
        Ok(_) => get_member(pool, id).await,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
            "member id or access code already in use".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Stores the first password hash for a member.
///
/// Returns `false` when a hash was already present, in which case nothing is
/// written and the caller must verify against the stored hash instead.
pub async fn set_initial_password(
    pool: &SqlitePool,
    member_id: &str,
    password_hash: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE members SET password_hash = ?, updated_at = datetime('now') \
         WHERE id = ? AND password_hash IS NULL",
    )
    .bind(password_hash)
    .bind(member_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn get_password_hash(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<Option<String>, AppError> {
    let hash: Option<Option<String>> =
        sqlx::query_scalar("SELECT password_hash FROM members WHERE id = ?")
            .bind(member_id)
            .fetch_optional(pool)
            .await?;
    Ok(hash.flatten())
}

/// Applies an assignment edit. `Some("")` clears the field, `None` leaves it.
pub async fn update_assignments(
    pool: &SqlitePool,
    member_id: &str,
    santa_for: Option<&str>,
    roast_target: Option<&str>,
) -> Result<MemberRow, AppError> {
    let mut sets = Vec::new();
    let mut values: Vec<Option<String>> = Vec::new();

    if let Some(target) = santa_for {
        sets.push("santa_for = ?");
        values.push((!target.is_empty()).then(|| target.to_string()));
    }
    if let Some(target) = roast_target {
        sets.push("roast_target = ?");
        values.push((!target.is_empty()).then(|| target.to_string()));
    }

    if sets.is_empty() {
        return get_member(pool, member_id).await;
    }

    sets.push("updated_at = datetime('now')");
    let query = format!("UPDATE members SET {} WHERE id = ?", sets.join(", "));
    let mut q = sqlx::query(&query);
    for v in &values {
        q = q.bind(v);
    }
    let result = q.bind(member_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("unknown member".to_string()));
    }

    get_member(pool, member_id).await
}

pub async fn lock_votes(pool: &SqlitePool, member_id: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE members SET votes_locked = 1, updated_at = datetime('now') WHERE id = ?")
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(())
}
