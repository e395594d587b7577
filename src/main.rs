use anyhow::Result;
use clap::{Parser, Subcommand};
use fxconv::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert { from, to, amount } => {
                fxconv::AppCommand::Convert { from, to, amount }
            }
            Commands::Interactive => fxconv::AppCommand::Interactive,
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount once and exit
    Convert {
        /// Source currency code
        #[arg(long)]
        from: Option<String>,
        /// Target currency code
        #[arg(long)]
        to: Option<String>,
        /// Amount to convert
        #[arg(long)]
        amount: Option<f64>,
    },
    /// Start an interactive conversion session
    Interactive,
    /// List selectable currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            fxconv::run_command(fxconv::AppCommand::Interactive, cli.config_path.as_deref()).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxconv::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://v6.exchangerate-api.com/v6"
  api_key: "YOUR-API-KEY"

defaults:
  from: "USD"
  to: "EUR"
  amount: 1.0

debounce_ms: 500
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
