use sqlx::PgPool;
use uuid::Uuid;

/// Log an audit event. Called explicitly after admin-relevant mutations;
/// a failed write is logged and never fails the request.
pub async fn log_event(
    pool: &PgPool,
    actor_id: &str,
    action: &str,
    submission_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    if let Err(e) = crate::db::audit::log_event(pool, actor_id, action, submission_id, details).await
    {
        tracing::error!("Failed to log audit event: {e}");
    }
}
