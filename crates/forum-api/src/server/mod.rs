//! Server setup and initialization
//!
//! Wires configuration into the service context, builds the router and
//! serves it until Ctrl-C or SIGTERM.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use forum_common::{AppConfig, AppError, JwtService};
use forum_db::{
    create_pool, run_migrations, DatabaseConfig, PgConversationRepository, PgMessageRepository,
    PgPool, PgSessionRepository, PgUserRepository, PgVerificationRepository,
};
use forum_service::mail::sender_from_config;
use forum_service::{AuthSettings, LocalAvatarStorage, Repositories, ServiceContextBuilder};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes and avatar files bypass the rate limiter.
pub fn create_app(state: AppState, config: &AppConfig) -> Result<Router, AppError> {
    let avatars = ServeDir::new(Path::new(&config.storage.upload_dir).join("avatars"));

    let router = rate_limit(create_router(), &config.rate_limit)?
        .merge(health_routes())
        .nest_service("/avatars", avatars);

    Ok(apply_middleware(router, &config.cors, config.app.env).with_state(state))
}

/// Connect to PostgreSQL and apply migrations when enabled
pub async fn connect_database(config: &AppConfig) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
    }

    Ok(pool)
}

/// Build the service context on top of an open pool
pub fn create_app_state(config: &AppConfig, pool: PgPool) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::new(
        &config.auth.secret,
        config.auth.session_expiry_secs,
    ));

    let repositories = Repositories::from_stores(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgConversationRepository::new(pool.clone())),
        Arc::new(PgMessageRepository::new(pool.clone())),
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgVerificationRepository::new(pool.clone())),
    );

    if config.email.resend_api_key.is_none() {
        warn!("RESEND_API_KEY not set, emails will only be logged");
    }

    let avatar_storage = Arc::new(LocalAvatarStorage::new(
        &config.storage.upload_dir,
        &config.storage.public_base_url,
    ));

    let service_context = ServiceContextBuilder::new()
        .repositories(repositories)
        .jwt_service(jwt_service)
        .email_sender(sender_from_config(config))
        .avatar_storage(avatar_storage)
        .auth_settings(AuthSettings::from_config(config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, pool))
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// Connect info is attached so the rate limiter and session records can see
/// the peer address.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let pool = connect_database(&config).await?;
    let state = create_app_state(&config, pool)?;
    let app = create_app(state, &config)?;

    let addr = config.api.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);
    serve(listener, app, shutdown_signal()).await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        () = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
