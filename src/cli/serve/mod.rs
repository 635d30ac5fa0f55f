//! Serve command - runs the API server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api;
use crate::config::AppConfig;
use crate::domain::Tracer;
use crate::infrastructure::logging;

/// Upper bound on the final flush at shutdown
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Run the API server
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config);

    let state = crate::create_app_state(&config)?;
    let tracer = state.tracer.clone();
    let app = api::create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);
    info!("Tracing to Langfuse at {}", config.langfuse.host);

    let listener = TcpListener::bind(addr).await?;

    // Interval flusher, standing in for the background thread the original
    // server got from its tracing SDK
    let flusher = tokio::spawn(flush_loop(
        tracer.clone(),
        Duration::from_secs(config.langfuse.flush_interval_secs.max(1)),
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    flusher.abort();

    // Buffered records must be sent before exit; bounded so shutdown
    // cannot hang on an unreachable backend
    shutdown_flush(tracer.as_ref()).await;

    info!("Server shut down");
    Ok(())
}

fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn flush_loop(tracer: Arc<dyn Tracer>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if let Err(e) = tracer.flush().await {
            warn!(error = %e, "Periodic trace flush failed");
        }
    }
}

/// Final flush, invoked exactly once on the shutdown path
async fn shutdown_flush(tracer: &dyn Tracer) {
    match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, tracer.flush()).await {
        Ok(Ok(())) => info!("Flushed buffered trace records"),
        Ok(Err(e)) => warn!(error = %e, "Failed to flush trace records at shutdown"),
        Err(_) => warn!("Timed out flushing trace records at shutdown"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
