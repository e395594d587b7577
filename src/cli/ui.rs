use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::controller::RenderSink;
use crate::currencies::CurrencyCatalog;

/// Renders controller output to the terminal.
///
/// The loading indicator maps to an indicatif spinner; the manual
/// trigger flag is tracked but has no widget to disable, since a
/// one-line prompt cannot grey out a button.
pub struct TerminalSink {
    spinner: Option<ProgressBar>,
    convert_enabled: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        TerminalSink {
            spinner: None,
            convert_enabled: true,
        }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn set_converted_amount(&mut self, text: &str) {
        if !text.is_empty() {
            println!("{}", style(text).green().bold());
        }
    }

    fn set_rate_text(&mut self, text: &str) {
        if !text.is_empty() {
            println!("{}", style(text).dim());
        }
    }

    fn set_error(&mut self, message: Option<&str>) {
        if let Some(message) = message {
            eprintln!("{}", style(message).red());
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap(),
            );
            spinner.set_message("Fetching rates...");
            spinner.enable_steady_tick(Duration::from_millis(80));
            self.spinner = Some(spinner);
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn set_convert_enabled(&mut self, enabled: bool) {
        self.convert_enabled = enabled;
    }
}

/// Prints the selectable currencies as a styled table.
pub fn print_currency_table(catalog: &CurrencyCatalog) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![header_cell("Code"), header_cell("Currency")]);

    for (code, name) in catalog.iter() {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }

    println!("{table}");
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
