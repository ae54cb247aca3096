use std::net::SocketAddr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use feedback_desk::config::Config;

const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting feedback desk");

    if config.uses_default_secret() {
        tracing::warn!("FEEDBACK_SESSION_SECRET is not set; sessions are signed with the default secret");
    }
    if config.admin_id.is_none() {
        tracing::warn!("FEEDBACK_ADMIN_ID is not set; nobody can answer submissions");
    }

    let pool = connect_with_retry(&config.database_url).await;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    let addr = SocketAddr::new(config.host, config.port);
    let (app, state) = feedback_desk::build_app(pool, config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Periodic rate limiter cleanup
    let cleanup_state = state.clone();
    let mut cleanup_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        let max_age =
            Duration::from_secs(cleanup_state.config.submission_window_secs.max(60) * 2);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(300)) => {
                    cleanup_state.submission_limiter.cleanup(max_age);
                }
                _ = cleanup_shutdown.changed() => break,
            }
        }
    });

    let bot_tasks = feedback_desk::bot::spawn(state.clone(), shutdown_rx);
    if bot_tasks.is_none() {
        tracing::info!("TELEGRAM_TOKEN is not set; running without the chat bot");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    for handle in bot_tasks.unwrap_or_default() {
        let _ = handle.await;
    }

    tracing::info!("Stopped");
    Ok(())
}

/// The store is the only thing startup waits on; keep trying until it answers.
async fn connect_with_retry(database_url: &str) -> PgPool {
    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("Connected to database");
                return pool;
            }
            Err(e) => {
                tracing::error!(
                    "Database connection failed: {e}; retrying in {}s",
                    CONNECT_RETRY_DELAY.as_secs()
                );
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
