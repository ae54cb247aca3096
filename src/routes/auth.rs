use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{Claims, encode_token};
use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: String,
    #[serde(default)]
    pub is_telegram: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }
    if user_id.contains('\0') {
        return Err(AppError::BadRequest(
            "userId must not contain NUL characters".to_string(),
        ));
    }

    let bound = auth::bind(user_id, &state.config);

    let claims = Claims::new(
        bound.user_id.clone(),
        bound.role,
        state.config.session_ttl_hours,
    );
    let token = encode_token(&claims, &state.config.session_secret).map_err(AppError::Internal)?;

    tracing::info!(
        "Session bound for {} as {} (telegram: {})",
        bound.user_id,
        bound.role.as_str(),
        req.is_telegram
    );

    let jar = auth::session_cookie(&token, &state.config);
    Ok((
        jar,
        Json(SessionResponse {
            user_id: bound.user_id,
            role: bound.role,
        }),
    ))
}

pub async fn whoami(auth: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: auth.user_id,
        role: auth.role,
    })
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        auth::clear_session_cookie(),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
