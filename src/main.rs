//! Hourglass - A countdown timer service
//!
//! This is the main entry point for the hourglass application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

use hourglass::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::Handoff,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("hourglass={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting hourglass server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, poll={}ms, tick={}ms",
          config.host, config.port, config.poll_interval_ms, config.tick_ms);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.poll_interval(),
        config.tick(),
    ));

    // Pick up a timer handed off by a previous process
    if let Some(remaining_ms) = config.resume_ms {
        info!("Resuming handed-off timer with {}ms remaining", remaining_ms);
        state.spawn_background(Handoff::new(remaining_ms)).await;
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start a timer ({{hours, minutes, seconds}} or {{duration_ms}})");
    info!("  POST /pause   - Pause the running timer");
    info!("  POST /resume  - Resume the paused timer");
    info!("  POST /cancel  - Cancel the timer");
    info!("  POST /handoff - Move the running timer to the background runner");
    info!("  GET  /status  - Check current timer status");
    info!("  GET  /health  - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(signal) => info!("Shutdown signal {} received", signal),
                Err(e) => tracing::error!("Signal handling failed: {}", e),
            }
        }
    }

    // Hand the running timer to whoever restarts us
    match state.detach().await {
        Ok(handoff) => {
            info!("Handing off timer with {}ms remaining", handoff.remaining_ms);
            println!("{}", serde_json::to_string(&handoff)?);
        }
        Err(e) => debug!("No timer to hand off: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
