use sqlx::{Row, SqlitePool};

use crate::error::AppError;
use crate::models::answer::Answer;

fn row_to_answer(row: sqlx::sqlite::SqliteRow) -> Answer {
    Answer {
        voter_id: row.get("voter_id"),
        question_id: row.get("question_id"),
        target_id: row.get("target_id"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_ANSWERS: &str = "SELECT voter_id, question_id, target_id, updated_at FROM answers";

/// One answer per (voter, question); a later call replaces the target.
/// Nothing is written once the voter has locked their answers.
pub async fn upsert_answer(
    pool: &SqlitePool,
    voter_id: &str,
    question_id: &str,
    target_id: &str,
) -> Result<Answer, AppError> {
    let row = sqlx::query(
        "INSERT INTO answers (voter_id, question_id, target_id) SELECT ?, ?, ? \
         WHERE EXISTS (SELECT 1 FROM members WHERE id = ? AND votes_locked = 0) \
         ON CONFLICT(voter_id, question_id) DO UPDATE SET \
         target_id = excluded.target_id, updated_at = datetime('now') \
         RETURNING voter_id, question_id, target_id, updated_at",
    )
    .bind(voter_id)
    .bind(question_id)
    .bind(target_id)
    .bind(voter_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Conflict("answers are locked".to_string()))?;

    Ok(row_to_answer(row))
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Answer>, AppError> {
    let rows = sqlx::query(&format!("{SELECT_ANSWERS} ORDER BY voter_id ASC, question_id ASC"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_answer).collect())
}

pub async fn list_for_voter(pool: &SqlitePool, voter_id: &str) -> Result<Vec<Answer>, AppError> {
    let rows = sqlx::query(&format!(
        "{SELECT_ANSWERS} WHERE voter_id = ? ORDER BY question_id ASC"
    ))
    .bind(voter_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(row_to_answer).collect())
}
