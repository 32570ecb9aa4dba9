use sqlx::SqlitePool;
use std::path::Path;

use crate::error::AppError;
use crate::models::member::normalize_access_code;
use crate::models::roster::{self, RosterEntry};
use crate::snowflake;

pub async fn load_roster_file(path: &Path) -> Result<Vec<RosterEntry>, AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Internal(format!("failed to read roster {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::BadRequest(format!("invalid roster {}: {e}", path.display())))
}

/// Imports a roster in one transaction and returns the number of members written.
///
/// With `replace`, every existing member (and through cascades, all game
/// data) is removed first.
pub async fn import_roster(
    pool: &SqlitePool,
    entries: Vec<RosterEntry>,
    replace: bool,
) -> Result<usize, AppError> {
    let entries: Vec<RosterEntry> = entries
        .into_iter()
        .map(|mut entry| {
            if entry.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
                entry.id = Some(snowflake::generate());
            }
            entry
        })
        .collect();

    roster::validate(&entries).map_err(AppError::BadRequest)?;

    let mut tx = pool.begin().await?;

    if replace {
        sqlx::query("DELETE FROM members").execute(&mut *tx).await?;
    }

    for entry in &entries {
        let result = sqlx::query(
            "INSERT INTO members (id, display_name, avatar, access_code, is_admin) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(entry.display_name.trim())
        .bind(&entry.avatar)
        .bind(normalize_access_code(&entry.access_code))
        .bind(entry.is_admin)
        .execute(&mut *tx)
        .await;

        if let Err(sqlx::Error::Database(e)) = &result {
            if e.is_unique_violation() {
                return Err(AppError::Conflict(format!(
                    "member {} or its access code already exists",
                    entry.id.as_deref().unwrap_or_default()
                )));
            }
        }
        result?;
    }

    // Assignments reference other members, so they go in once everyone exists.
    for entry in &entries {
        if entry.santa_for.is_none() && entry.roast_target.is_none() {
            continue;
        }
        sqlx::query("UPDATE members SET santa_for = ?, roast_target = ? WHERE id = ?")
            .bind(&entry.santa_for)
            .bind(&entry.roast_target)
            .bind(&entry.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!("imported {} member(s) from roster", entries.len());
    Ok(entries.len())
}
