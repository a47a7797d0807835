use std::sync::Arc;

use beacon::config::Config;
use beacon::server::{Listener, shutdown_channel};
use beacon::site::Router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!(
        document_root = %cfg.site.document_root.display(),
        agents = ?cfg.site.allowed_agents,
        "Starting"
    );

    let (trigger, shutdown) = shutdown_channel();
    let listener = Listener::bind(&cfg.server, shutdown).await?;
    let router = Arc::new(Router::new(cfg.site.clone()));

    let mut server = tokio::spawn(listener.run(router));

    tokio::select! {
        res = &mut server => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            trigger.trigger();
            server.await??;
        }
    }

    Ok(())
}
