//! Server setup and initialization
//!
//! Wires Postgres repositories, Redis session stores, and the notifier into
//! a service context, then serves the router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use blood_cache::{RedisPendingLoginStore, RedisPool, RedisRefreshTokenStore};
use blood_common::{AppConfig, AppError, JwtService};
use blood_db::{
    create_pool, run_migrations, DatabaseConfig, PgDonorRepository, PgFeedbackRepository,
    PgOtpRepository, PgPatientRepository, PgUserRepository,
};
use blood_service::services::{LogNotifier, ServiceSettings, SystemClock};
use blood_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_common_layers, apply_middleware};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes skip the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware(create_router(), config)?;
    let health = apply_common_layers(health_routes(), config.api.request_timeout_secs);
    Ok(api.merge(health).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        info!("Applying database migrations...");
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    info!("Connecting to Redis...");
    let redis = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .donor_repo(Arc::new(PgDonorRepository::new(pool.clone())))
        .patient_repo(Arc::new(PgPatientRepository::new(pool.clone())))
        .otp_repo(Arc::new(PgOtpRepository::new(pool.clone())))
        .feedback_repo(Arc::new(PgFeedbackRepository::new(pool.clone())))
        .pending_logins(Arc::new(RedisPendingLoginStore::with_ttl(
            redis.clone(),
            config.otp.pending_login_ttl_secs,
        )))
        .refresh_tokens(Arc::new(RedisRefreshTokenStore::new(redis.clone())))
        .jwt_service(jwt_service)
        .notifier(Arc::new(LogNotifier))
        .clock(Arc::new(SystemClock))
        .settings(ServiceSettings::from(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    // Peer addresses feed the rate limiter's fallback key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}
