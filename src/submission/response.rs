use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::live::EventKind;
use crate::middleware::audit;
use crate::models::{AdminResponse, Submission};
use crate::state::SharedState;

/// Answer a `new` submission. This is the only way a submission changes state.
///
/// The transition happens in a single conditional update, so of two
/// concurrent responders exactly one wins; the other gets `Conflict`, as does
/// anyone answering an already-answered submission.
pub async fn respond(
    state: &SharedState,
    auth: &AuthUser,
    id: Uuid,
    text: String,
) -> Result<Submission, AppError> {
    auth.require_admin()?;

    let response = AdminResponse {
        text,
        date: Utc::now(),
    };

    let Some(submission) = db::submissions::mark_answered(&state.pool, id, &response).await?
    else {
        return match db::submissions::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Conflict(
                "Complaint has already been answered".to_string(),
            )),
            None => Err(AppError::NotFound("Complaint not found".to_string())),
        };
    };

    tracing::info!("Submission {id} answered by {}", auth.user_id);

    audit::log_event(
        &state.pool,
        &auth.user_id,
        "submission.responded",
        Some(id),
        Some(json!({ "owner": submission.user_id })),
    )
    .await;

    state.notifier.publish(EventKind::Updated, &submission);
    Ok(submission)
}
