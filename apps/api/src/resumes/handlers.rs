use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::AuthUser;
use crate::config::OwnershipPolicy;
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resumes::validation::{validate_new_resume, validate_resume_patch};
use crate::state::AppState;

/// Resume ids are integers. Anything else names a resume that cannot exist.
fn parse_resume_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!("Rejected request body: {rejection}");
            Err(AppError::validation(rejection.body_text()))
        }
    }
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    let resumes = state.store.list(&user.id).await?;
    Ok(Json(resumes))
}

/// GET /api/resumes/:id
///
/// The read is unscoped, so ownership is checked here. Under the default
/// `Conceal` policy a foreign resume is indistinguishable from a missing one.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let not_found = || AppError::NotFound("Resume not found".to_string());

    let id = parse_resume_id(&raw_id).ok_or_else(not_found)?;
    let resume = state.store.get(id).await?.ok_or_else(not_found)?;

    if resume.user_id != user.id {
        warn!("User {} requested resume {id} owned by another account", user.id);
        return Err(match state.config.ownership_policy {
            OwnershipPolicy::Conceal => not_found(),
            OwnershipPolicy::Reveal => AppError::Forbidden,
        });
    }

    Ok(Json(resume))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let input = validate_new_resume(&json_body(body)?)?;
    let resume = state.store.create(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PATCH /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Resume>, AppError> {
    let patch = validate_resume_patch(&json_body(body)?)?;
    let id = parse_resume_id(&raw_id)
        .ok_or_else(|| AppError::NotFound("Resume not found or unauthorized".to_string()))?;

    let resume = state.store.update(id, &user.id, patch).await?;
    Ok(Json(resume))
}

/// DELETE /api/resumes/:id
///
/// Always 204 for an authenticated caller: deleting a missing or foreign
/// resume is a no-op and reveals nothing.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if let Some(id) = parse_resume_id(&raw_id) {
        state.store.delete(id, &user.id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resume_id() {
        assert_eq!(parse_resume_id("17"), Some(17));
        assert_eq!(parse_resume_id("abc"), None);
        assert_eq!(parse_resume_id(""), None);
    }
}
