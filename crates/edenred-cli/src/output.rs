//! Rendering of balances for standard output.

use anyhow::Result;
use clap::ValueEnum;
use edenred_core::Balances;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Two lines, `Lunch:` and `Virike:`
    Text,
    /// One JSON object with `lunch` and `virike`
    Json,
}

/// Render balances in the requested format, newline-terminated.
pub fn render(balances: &Balances, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => format!(
            "Lunch: {:.2}\nVirike: {:.2}\n",
            balances.lunch, balances.virike
        ),
        OutputFormat::Json => format!("{}\n", serde_json::to_string(balances)?),
    })
}
