use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{AdminResponse, Role, Submission, SubmissionKind, SubmissionStatus};

pub struct NewSubmission<'a> {
    pub user_id: &'a str,
    pub user_role: Role,
    pub kind: SubmissionKind,
    pub message: &'a str,
    pub contact_info: &'a str,
}

pub async fn create(pool: &PgPool, new: &NewSubmission<'_>) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions (id, user_id, user_role, kind, message, contact_info)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(new.user_id)
    .bind(new.user_role)
    .bind(new.kind)
    .bind(new.message)
    .bind(new.contact_info)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_status(
    pool: &PgPool,
    status: SubmissionStatus,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions WHERE status = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Moves a `new` submission to `answered` in one statement.
/// Returns `None` when the id is unknown or the submission was already answered.
pub async fn mark_answered(
    pool: &PgPool,
    id: Uuid,
    response: &AdminResponse,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "UPDATE submissions SET status = 'answered', admin_response = $2
         WHERE id = $1 AND status = 'new'
         RETURNING *",
    )
    .bind(id)
    .bind(Json(response))
    .fetch_optional(pool)
    .await
}

/// Delete a submission. With `owner` set, only that identity's record is removed.
pub async fn delete(
    pool: &PgPool,
    id: Uuid,
    owner: Option<&str>,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "DELETE FROM submissions WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)
         RETURNING *",
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await
}
