pub mod extractor;
pub mod jwt;

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::config::Config;
use crate::models::Role;

pub use extractor::AuthUser;

pub const SESSION_COOKIE: &str = "session";

/// `admin` iff the identity equals the configured administrator identity.
pub fn resolve_role(user_id: &str, admin_id: Option<&str>) -> Role {
    match admin_id {
        Some(admin) if admin == user_id => Role::Admin,
        _ => Role::User,
    }
}

/// Bind an identity for the rest of the session.
pub fn bind(user_id: &str, config: &Config) -> AuthUser {
    AuthUser::new(
        user_id,
        resolve_role(user_id, config.admin_id.as_deref()),
    )
}

pub fn session_cookie(token: &str, config: &Config) -> CookieJar {
    // Telegram WebApps are embedded cross-site, which needs SameSite=None + Secure
    let same_site = if config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };

    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .max_age(time::Duration::hours(config.session_ttl_hours))
        .build();

    CookieJar::new().add(cookie)
}

pub fn clear_session_cookie() -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}
