use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use devices_core::validation::source::{CatalogSource, ReloadMode};
use devices_core::validation::validator::DeviceValidator;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devices_api::background::catalog_refresh;
use devices_api::config::ServerConfig;
use devices_api::router::build_app_router;
use devices_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devices_api=debug,devices_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        rules_path = %config.rules.path.display(),
        reload_mode = ?config.rules.reload_mode,
        unknown_type_policy = ?config.rules.unknown_type_policy,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = devices_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    devices_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    devices_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Rule catalog ---
    let catalog_source = Arc::new(CatalogSource::new(
        config.rules.path.clone(),
        Duration::from_secs(config.rules.load_timeout_secs),
        config.rules.reload_mode,
    ));

    // A missing or broken catalog is not fatal: validated requests answer 500
    // until it becomes loadable.
    match catalog_source.reload().await {
        Ok(catalog) => tracing::info!(groups = catalog.len(), "Rule catalog loaded"),
        Err(e) => tracing::error!(error = %e, "Rule catalog could not be loaded at startup"),
    }

    let refresh_cancel = CancellationToken::new();
    let refresh_handle = (config.rules.reload_mode == ReloadMode::Cached).then(|| {
        tokio::spawn(catalog_refresh::run(
            Arc::clone(&catalog_source),
            Duration::from_secs(config.rules.refresh_interval_secs),
            refresh_cancel.clone(),
        ))
    });

    // --- App state ---
    let validator = DeviceValidator::new(
        Arc::clone(&catalog_source),
        Arc::new(devices_db::PgDeviceTypeLookup::new(pool.clone())),
        config.rules.unknown_type_policy,
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        validator: Arc::new(validator),
        devices: Arc::new(devices_db::PgDeviceStore::new(pool.clone())),
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
    tracing::info!("Server stopped accepting connections, cleaning up");

    refresh_cancel.cancel();
    if let Some(handle) = refresh_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Rule catalog refresh job stopped");
    }

    pool.close().await;
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
