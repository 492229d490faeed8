use std::path::PathBuf;

use anyhow::Result;
use artbuddy_cli::Overrides;
use artbuddy_core::locale::Locale;
use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "artbuddy")]
#[command(about = "ArtBuddy - encouraging feedback on drawings and photos", long_about = None)]
struct Cli {
    /// Directory holding config.toml and secret.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve sessions over TCP, one JSON line per message
    Serve {
        #[command(flatten)]
        session: SessionArgs,

        /// Address to listen on (overrides [server] bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run a single session over stdin/stdout
    Stdio {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Write config.toml and secret.json templates
    Init,
}

#[derive(Args)]
struct SessionArgs {
    /// Answer with an offline model instead of Gemini
    #[arg(long)]
    dry_run: bool,

    /// Language of the user-facing copy (ko, en)
    #[arg(long)]
    locale: Option<Locale>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            config_dir: self.config_dir.clone(),
            ..Overrides::default()
        };
        let session = match &self.command {
            Commands::Serve { session, bind } => {
                overrides.bind = bind.clone();
                session
            }
            Commands::Stdio { session } => session,
            Commands::Init => return overrides,
        };
        overrides.dry_run = session.dry_run;
        overrides.locale = session.locale;
        overrides.model = session.model.clone();
        overrides
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    artbuddy_cli::logging::init_tracing(cli.log.as_deref());
    let overrides = cli.overrides();

    let result = match cli.command {
        Commands::Serve { .. } => commands::serve::run(&overrides).await,
        Commands::Stdio { .. } => commands::stdio::run(&overrides).await,
        Commands::Init => commands::init::run(&overrides),
    };
    if let Err(err) = &result {
        tracing::error!("[Bootstrap] Fatal: {err:#}");
    }
    result
}
