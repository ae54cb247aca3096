pub mod audit;
pub mod auth;
pub mod health;
pub mod submissions;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::live::socket;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Session
        .route("/api/login", post(auth::login))
        .route("/api/user", get(auth::whoami))
        .route("/api/logout", post(auth::logout))
        // Submissions
        .route(
            "/api/complaints",
            get(submissions::list).post(submissions::create),
        )
        .route("/api/complaints/{id}", delete(submissions::delete))
        .route("/api/complaints/{id}/respond", put(submissions::respond))
        // Audit
        .route("/api/audit", get(audit::list))
        // Live updates
        .route("/api/live", get(socket::connect))
        .route("/health", get(health::health))
}
