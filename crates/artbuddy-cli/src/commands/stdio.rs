use anyhow::Result;
use artbuddy_cli::{Overrides, build_app, serve_connection};

/// One session over stdin/stdout. Logs stay on stderr.
pub async fn run(overrides: &Overrides) -> Result<()> {
    let app = build_app(overrides).await?;
    serve_connection(tokio::io::stdin(), tokio::io::stdout(), app.directory).await
}
