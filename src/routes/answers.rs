use axum::extract::{Path, State};
use axum::Json;

use crate::badges;
use crate::db;
use crate::error::AppError;
use crate::gateway::events::{Audience, ChangeEvent};
use crate::middleware::auth::AuthUser;
use crate::middleware::permissions::require_admin;
use crate::models::answer::SaveAnswer;
use crate::models::question::{self, Question, QUESTIONS};
use crate::state::AppState;

pub async fn save_answer(
    state: State<AppState>,
    Path(question_id): Path<String>,
    auth: AuthUser,
    Json(input): Json<SaveAnswer>,
) -> Result<Json<serde_json::Value>, AppError> {
    let question = question::find(&question_id)
        .ok_or_else(|| AppError::BadRequest("unknown question".to_string()))?;

    let voter = db::members::get_member(&state.db, &auth.member_id).await?;
    if voter.votes_locked {
        return Err(AppError::Conflict("answers are locked".to_string()));
    }

    let target = db::members::get_member(&state.db, &input.target_id).await?;
    if target.id == voter.id {
        return Err(AppError::BadRequest("cannot vote for yourself".to_string()));
    }
    if target.is_admin {
        return Err(AppError::BadRequest("cannot vote for an admin".to_string()));
    }

    let answer =
        db::answers::upsert_answer(&state.db, &voter.id, question.id, &target.id).await?;
    state.dispatcher.publish(
        Audience::MembersAndAdmins(vec![voter.id.clone()]),
        ChangeEvent::AnswerUpsert(answer.clone()),
    );

    let winners = badges::load_winners(&state.db).await?;
    state
        .dispatcher
        .publish(Audience::Everyone, ChangeEvent::BadgesUpdate(winners));

    Ok(Json(serde_json::json!({ "data": answer })))
}

pub async fn list_own_answers(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let answers = db::answers::list_for_voter(&state.db, &auth.member_id).await?;
    Ok(Json(serde_json::json!({ "data": answers })))
}

/// Locks the caller's answers. The response lists questions left unanswered.
pub async fn lock_answers(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let answers = db::answers::list_for_voter(&state.db, &auth.member_id).await?;
    db::members::lock_votes(&state.db, &auth.member_id).await?;
    tracing::info!(member_id = %auth.member_id, answered = answers.len(), "answers locked");

    let unanswered: Vec<&Question> = QUESTIONS
        .iter()
        .filter(|q| !answers.iter().any(|a| a.question_id == q.id))
        .collect();

    Ok(Json(serde_json::json!({
        "data": {
            "votes_locked": true,
            "unanswered": unanswered
        }
    })))
}

pub async fn list_all_answers(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let answers = db::answers::list_all(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": answers })))
}
