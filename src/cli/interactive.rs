//! Stdin-driven interactive conversion session.
//!
//! A background task parses typed lines into UI events; the controller
//! loop consumes them until the user quits.

use anyhow::Result;
use console::style;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::ui::{self, TerminalSink};
use crate::config::AppConfig;
use crate::controller::{Controller, UiEvent};
use crate::currencies::CurrencyCatalog;
use crate::rates::RateProvider;

/// What a typed line asks for.
#[derive(Debug, PartialEq)]
enum Command {
    Event(UiEvent),
    Currencies,
    Help,
    Quit,
    Noop,
}

pub async fn run<P>(provider: P, catalog: CurrencyCatalog, config: &AppConfig) -> Result<()>
where
    P: RateProvider + 'static,
{
    println!(
        "Converting {} {} to {}. {}",
        config.defaults.amount,
        catalog.label(&config.defaults.from),
        catalog.label(&config.defaults.to),
        style("Type `help` for commands.").dim()
    );

    let controller = Controller::new(
        provider,
        TerminalSink::new(),
        &config.defaults.from,
        &config.defaults.to,
        &config.defaults.amount.to_string(),
        Duration::from_millis(config.debounce_ms),
    );

    let (tx, rx) = mpsc::channel(16);
    let reader = tokio::spawn(read_events(tx, catalog));
    controller.run(rx).await;
    reader.await?;
    Ok(())
}

async fn read_events(tx: mpsc::Sender<UiEvent>, catalog: CurrencyCatalog) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_line(&line, &catalog) {
            Ok(Command::Event(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(Command::Currencies) => ui::print_currency_table(&catalog),
            Ok(Command::Help) => print_help(),
            Ok(Command::Quit) => break,
            Ok(Command::Noop) => {}
            Err(message) => eprintln!("{}", style(message).red()),
        }
    }
    // Dropping the sender ends the controller loop.
}

fn parse_line(line: &str, catalog: &CurrencyCatalog) -> Result<Command, String> {
    let line = line.trim();
    let mut words = line.split_whitespace();

    match words.next() {
        None => Ok(Command::Noop),
        Some("help") => Ok(Command::Help),
        Some("currencies") => Ok(Command::Currencies),
        Some("quit") | Some("exit") | Some("q") => Ok(Command::Quit),
        Some("convert") => Ok(Command::Event(UiEvent::Submit)),
        Some("swap") => Ok(Command::Event(UiEvent::Swap)),
        Some("from") => parse_currency(words.next(), catalog).map(|code| {
            Command::Event(UiEvent::SourceChanged(code))
        }),
        Some("to") => parse_currency(words.next(), catalog).map(|code| {
            Command::Event(UiEvent::TargetChanged(code))
        }),
        // Anything else is treated as an amount edit; the controller
        // resets the display when it does not parse.
        Some(_) => Ok(Command::Event(UiEvent::AmountEdited(line.to_string()))),
    }
}

fn parse_currency(word: Option<&str>, catalog: &CurrencyCatalog) -> Result<String, String> {
    let word = word.ok_or_else(|| "Expected a currency code".to_string())?;
    let code = word.to_uppercase();
    if catalog.contains(&code) {
        Ok(code)
    } else {
        Err(format!("Unknown currency code: {word}"))
    }
}

fn print_help() {
    println!(
        "Commands:\n  \
         <amount>       convert after a short pause\n  \
         from <CODE>    change the source currency\n  \
         to <CODE>      change the target currency\n  \
         swap           exchange source and target\n  \
         convert        convert now\n  \
         currencies     list selectable currencies\n  \
         quit           leave the session"
    );
}
