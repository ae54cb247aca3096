use std::net::IpAddr;

pub const DEFAULT_SESSION_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    /// Identity that resolves to the `admin` role. `None` means nobody is admin.
    pub admin_id: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin (mirrored).
    pub cors_origins: Vec<String>,
    pub production: bool,
    pub max_body_size: usize,
    pub static_dir: String,
    pub submission_limit: u32,
    pub submission_window_secs: u64,
    pub log_level: String,
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_base: String,
    pub webapp_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let session_secret = env_or("FEEDBACK_SESSION_SECRET", DEFAULT_SESSION_SECRET);

        let session_ttl_hours: i64 = env_or("FEEDBACK_SESSION_TTL_HOURS", "168")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_SESSION_TTL_HOURS: {e}"))?;

        let admin_id = std::env::var("FEEDBACK_ADMIN_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let host: IpAddr = env_or("FEEDBACK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_HOST: {e}"))?;

        // PORT is honoured for platforms that inject it
        let port_raw = std::env::var("FEEDBACK_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "3000".to_string());
        let port: u16 = port_raw
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_PORT: {e}"))?;

        let cors_origins = parse_origins(&env_or("FEEDBACK_CORS_ORIGINS", "*"));

        let production = matches!(
            env_or("FEEDBACK_PRODUCTION", "false").as_str(),
            "1" | "true" | "yes"
        );

        let max_body_size: usize = env_or("FEEDBACK_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_MAX_BODY_SIZE: {e}"))?;

        let static_dir = env_or("FEEDBACK_STATIC_DIR", "public");

        let submission_limit: u32 = env_or("FEEDBACK_SUBMISSION_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_SUBMISSION_LIMIT: {e}"))?;

        let submission_window_secs: u64 = env_or("FEEDBACK_SUBMISSION_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_SUBMISSION_WINDOW_SECS: {e}"))?;

        let log_level = env_or("FEEDBACK_LOG_LEVEL", "info");

        let telegram = std::env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .map(|token| TelegramConfig {
                token,
                api_base: env_or("TELEGRAM_API_BASE", "https://api.telegram.org"),
                webapp_url: std::env::var("FEEDBACK_WEBAPP_URL").ok(),
            });

        Ok(Config {
            database_url,
            session_secret,
            session_ttl_hours,
            admin_id,
            host,
            port,
            cors_origins,
            production,
            max_body_size,
            static_dir,
            submission_limit,
            submission_window_secs,
            log_level,
            telegram,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

/// `*` (or nothing) means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(str::to_string)
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origin_means_any() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn origin_list_is_trimmed() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,"),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
