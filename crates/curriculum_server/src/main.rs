//! Binary entrypoint for the curriculum HTTP server.
//!
//! Configuration comes from the environment; see [`ServerConfig`].

use std::process::ExitCode;

use curriculum_server::config::ServerConfig;
use curriculum_server::router::build_router;
use curriculum_server::state::AppState;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = curriculum_core::init_logging(&config.log_level, config.log_dir.as_deref())
    {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(&config.db_path)?;
    info!(
        "event=server_start module=server status=start db_path={} bind_addr={}",
        config.db_path.display(),
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
    }
}
