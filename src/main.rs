// src/main.rs
use anyhow::Result;
use heartbeat_monitor::{config, monitor::Monitor};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heartbeat_monitor=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // heartbeat-monitor [--once] [config-file]
    let mut once = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--once" {
            once = true;
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }

    if let Some(path) = &config_path {
        info!("Loading configuration from: {}", path.display());
    }
    let settings = config::load_settings(config_path.as_deref())?;
    info!("Loaded settings: {:?}", settings);

    if once {
        let monitor = Monitor::from_settings(settings)?;
        monitor.run_once().await;
        return Ok(());
    }

    let mut monitor = Monitor::from_settings(settings)?;
    let handle = monitor.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        handle.shutdown();
    });

    monitor.run().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
