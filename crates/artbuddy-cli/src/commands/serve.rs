use anyhow::{Context, Result};
use artbuddy_cli::{Overrides, build_app, serve_tcp};
use tokio::net::TcpListener;

pub async fn run(overrides: &Overrides) -> Result<()> {
    let app = build_app(overrides).await?;
    let bind = app.config.server.bind.clone();
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!(addr = %listener.local_addr()?, "[Server] Listening");

    tokio::select! {
        result = serve_tcp(listener, app.directory) => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            tracing::info!("[Server] Shutting down");
            Ok(())
        }
    }
}
