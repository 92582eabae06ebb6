//! Binary entrypoint for the graphpress HTTP server.
//!
//! Configuration comes from environment variables (see
//! [`graphpress_server::config`]); log filtering from `RUST_LOG`.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use graphpress_server::config::ServerConfig;
use graphpress_server::router::build_router;
use graphpress_server::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    if config.secure_cookies {
        tracing::info!("secure cookies enabled, sessions only travel over HTTPS");
    } else {
        tracing::warn!("secure cookies disabled, set GRAPHPRESS_SECURE_COOKIES=true behind HTTPS");
    }

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize application state");
            return ExitCode::FAILURE;
        }
    };
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("graphpress server listening on {}", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
