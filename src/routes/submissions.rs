use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::Submission;
use crate::state::SharedState;
use crate::submission::input::{SubmissionInput, validate_response_text};
use crate::submission::{pipeline, response};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmission {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub contact_info: Option<String>,
}

#[derive(Deserialize)]
pub struct RespondRequest {
    pub response: Option<String>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = pipeline::list(&state, &auth).await?;
    Ok(Json(submissions))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateSubmission>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let input = SubmissionInput::validate(
        req.kind.as_deref(),
        req.message.as_deref(),
        req.contact_info.as_deref(),
    )?;
    let submission = pipeline::submit(&state, &auth, input).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn respond(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<Submission>, AppError> {
    // Role before payload: non-admins get 403 even for a blank response or bad id
    auth.require_admin()?;
    let id = parse_id(&id)?;
    let text = validate_response_text(req.response.as_deref())?;
    let submission = response::respond(&state, &auth, id, text).await?;
    Ok(Json(submission))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    pipeline::delete(&state, &auth, id).await?;
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

/// A malformed id cannot name any record.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Complaint not found".to_string()))
}
