use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gatehouse_api::config::ServerConfig;
use gatehouse_api::middleware::rate_limit::RateLimiter;
use gatehouse_api::router::build_app_router;
use gatehouse_api::state::AppState;
use gatehouse_db::repositories::SessionRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the background sweep deletes expired session rows and stale
/// rate-limit counters. Expiry is already enforced lazily on read; the sweep
/// only bounds storage growth.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, environment = config.environment.as_str(), "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = gatehouse_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    gatehouse_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    gatehouse_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Rate limiter ---
    let rate_limiter = Arc::new(RateLimiter::new());

    // --- Background sweep ---
    let sweep_pool = pool.clone();
    let sweep_limiter = Arc::clone(&rate_limiter);
    let sweep_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.tick().await; // the first tick fires immediately
        loop {
            ticker.tick().await;
            match SessionRepo::sweep_expired(&sweep_pool).await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(deleted, "Swept expired sessions");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "Session sweep failed"),
            }
            let evicted = sweep_limiter.evict_stale();
            if evicted > 0 {
                tracing::debug!(evicted, "Evicted stale rate-limit counters");
            }
        }
    });
    tracing::info!("Background sweep task started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        rate_limiter,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    sweep_handle.abort();
    tracing::info!("Background sweep task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
