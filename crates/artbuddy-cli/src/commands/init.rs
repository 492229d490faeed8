use anyhow::{Context, Result};
use artbuddy_cli::Overrides;

pub fn run(overrides: &Overrides) -> Result<()> {
    let paths = overrides.paths();
    let config = paths
        .ensure_config_file()
        .context("Failed to write config.toml")?;
    let secret = paths
        .ensure_secret_file()
        .context("Failed to write secret.json")?;

    println!("⚙️  Config: {}", config.display());
    println!("🔑 Secrets: {}", secret.display());
    println!("Fill in gemini.api_key in secret.json, or set GOOGLE_API_KEY.");
    Ok(())
}
