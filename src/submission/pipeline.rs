use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db;
use crate::db::submissions::NewSubmission;
use crate::error::AppError;
use crate::live::EventKind;
use crate::middleware::audit;
use crate::models::Submission;
use crate::state::SharedState;

use super::input::SubmissionInput;

/// Store a validated submission owned by `auth` and announce it.
pub async fn submit(
    state: &SharedState,
    auth: &AuthUser,
    input: SubmissionInput,
) -> Result<Submission, AppError> {
    if let Err(retry_after) = state.submission_limiter.check(
        &auth.user_id,
        state.config.submission_limit,
        state.config.submission_window_secs,
    ) {
        return Err(AppError::RateLimited(format!(
            "Too many submissions. Retry after {retry_after}s"
        )));
    }

    let submission = db::submissions::create(
        &state.pool,
        &NewSubmission {
            user_id: &auth.user_id,
            user_role: auth.role,
            kind: input.kind,
            message: &input.message,
            contact_info: &input.contact_info,
        },
    )
    .await?;

    tracing::info!(
        "Submission {} ({:?}) created by {}",
        submission.id,
        submission.kind,
        submission.user_id
    );

    state.notifier.publish(EventKind::Created, &submission);
    Ok(submission)
}

/// Everything for an admin, only their own records for anyone else.
/// Newest first, unpaginated.
pub async fn list(state: &SharedState, auth: &AuthUser) -> Result<Vec<Submission>, AppError> {
    let submissions = if auth.is_admin() {
        db::submissions::list_all(&state.pool).await?
    } else {
        db::submissions::list_by_user(&state.pool, &auth.user_id).await?
    };
    Ok(submissions)
}

/// Owners may delete their own records; admins may delete any.
/// A record owned by someone else reads as not found.
pub async fn delete(
    state: &SharedState,
    auth: &AuthUser,
    id: Uuid,
) -> Result<Submission, AppError> {
    let owner = (!auth.is_admin()).then_some(auth.user_id.as_str());

    let submission = db::submissions::delete(&state.pool, id, owner)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    tracing::info!("Submission {id} deleted by {}", auth.user_id);

    audit::log_event(
        &state.pool,
        &auth.user_id,
        "submission.deleted",
        Some(id),
        Some(json!({ "owner": submission.user_id })),
    )
    .await;

    state.notifier.publish(EventKind::Deleted, &submission);
    Ok(submission)
}
