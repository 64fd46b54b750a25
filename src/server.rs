//! Server initialization and startup logic for deskhand.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use deskhand_api::{AppState, InterfaceConfig, InterfaceServer};
use deskhand_config::{Config, LoggingConfig};

use crate::register::{build_router, desktop};

/// Initialize tracing with console output and, when enabled, daily log files
/// under `logging.dir`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = if logging.file {
        let log_dir = logging.resolved_dir();
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("deskhand")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Dropping the guard stops the writer thread.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Run the server in foreground until Ctrl-C, then stop every autopress
/// entry.
pub(crate) async fn run_server(
    config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let desktop = desktop(&config);

    let report = desktop.check_environment().await;
    if !report.all_available() {
        warn!(
            "Some backends are unavailable; their operations will fail:\n{}",
            report
        );
    }

    let router = build_router(&config, desktop);
    info!("Registered {} capabilities", router.registry().len());

    let interface_config = InterfaceConfig {
        host: host.unwrap_or(config.server.host),
        port: port.unwrap_or(config.server.port),
    };
    let state = Arc::new(AppState::new(router.clone()));
    let server = InterfaceServer::new(interface_config, state);
    info!("Deskhand listening on http://{}", server.addr());

    let result = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await;

    let stopped = router.shutdown().await;
    info!("Stopped {} autopress entries", stopped);

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }
    info!("Deskhand stopped");
    Ok(())
}
