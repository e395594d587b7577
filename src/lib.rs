pub mod cache;
pub mod cli;
pub mod config;
pub mod controller;
pub mod convert;
pub mod currencies;
pub mod error;
pub mod log;
pub mod providers;
pub mod rates;

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::ui::TerminalSink;
use crate::controller::{Controller, SessionState, UiEvent};
use crate::currencies::CurrencyCatalog;
use crate::providers::ExchangeRateApiProvider;

pub enum AppCommand {
    /// Run one conversion cycle and exit.
    Convert {
        from: Option<String>,
        to: Option<String>,
        amount: Option<f64>,
    },
    /// Stdin-driven session with debounced amount edits.
    Interactive,
    /// List the selectable currencies.
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    // The catalog listing needs no configuration or network.
    if let AppCommand::Currencies = command {
        cli::ui::print_currency_table(&CurrencyCatalog::builtin());
        return Ok(());
    }

    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = ExchangeRateApiProvider::new(&config.provider.latest_endpoint());

    match command {
        AppCommand::Convert { from, to, amount } => {
            let from = from.unwrap_or_else(|| config.defaults.from.clone());
            let to = to.unwrap_or_else(|| config.defaults.to.clone());
            let amount = amount.unwrap_or(config.defaults.amount);
            convert_once(provider, &config, &from, &to, amount).await
        }
        AppCommand::Interactive => {
            cli::interactive::run(provider, CurrencyCatalog::builtin(), &config).await
        }
        AppCommand::Currencies => unreachable!("handled above"),
    }
}

/// Runs the startup conversion cycle against a closed event channel,
/// so the controller converts the preset selection once and returns.
async fn convert_once(
    provider: ExchangeRateApiProvider,
    config: &config::AppConfig,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<()> {
    let controller = Controller::new(
        provider,
        TerminalSink::new(),
        from,
        to,
        &amount.to_string(),
        Duration::from_millis(config.debounce_ms),
    );

    let (tx, rx) = mpsc::channel::<UiEvent>(1);
    drop(tx);
    let controller = controller.run(rx).await;

    match controller.state() {
        SessionState::Error(message) => anyhow::bail!("{message}"),
        _ => Ok(()),
    }
}
