use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::{Audience, ChangeEvent};
use crate::middleware::auth::AuthUser;
use crate::middleware::permissions::require_admin;
use crate::models::member::{AdminMemberView, UpdateAssignments};
use crate::state::AppState;

pub async fn list_members(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let members: Vec<AdminMemberView> = db::members::list_members(&state.db)
        .await?
        .iter()
        .map(|row| row.to_admin_view())
        .collect();
    Ok(Json(serde_json::json!({ "data": members })))
}

/// Checks a non-empty assignment target exists and is not the member itself.
async fn check_target(
    state: &AppState,
    member_id: &str,
    target: Option<&str>,
) -> Result<(), AppError> {
    match target {
        None | Some("") => Ok(()),
        Some(target) if target == member_id => Err(AppError::BadRequest(
            "a member cannot be assigned to themselves".to_string(),
        )),
        Some(target) => {
            db::members::get_member(&state.db, target)
                .await
                .map_err(|e| match e {
                    AppError::NotFound(_) => {
                        AppError::BadRequest(format!("unknown assignment target {target}"))
                    }
                    other => other,
                })?;
            Ok(())
        }
    }
}

pub async fn update_assignments(
    state: State<AppState>,
    Path(member_id): Path<String>,
    auth: AuthUser,
    Json(input): Json<UpdateAssignments>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&auth)?;
    let santa_for = input.santa_for.as_deref().map(str::trim);
    let roast_target = input.roast_target.as_deref().map(str::trim);

    db::members::get_member(&state.db, &member_id).await?;
    check_target(&state, &member_id, santa_for).await?;
    check_target(&state, &member_id, roast_target).await?;

    let row =
        db::members::update_assignments(&state.db, &member_id, santa_for, roast_target).await?;
    tracing::info!(member_id = %row.id, "assignments updated");

    state.dispatcher.publish(
        Audience::MembersAndAdmins(vec![row.id.clone()]),
        ChangeEvent::AssignmentUpdate {
            member_id: row.id.clone(),
            santa_for: row.santa_for.clone(),
            roast_target: row.roast_target.clone(),
        },
    );

    Ok(Json(serde_json::json!({ "data": row.to_admin_view() })))
}
