use std::time::Duration;

use clap::Parser;

use crate::output::OutputFormat;

/// Show Edenred lunch and Virike balances
#[derive(Parser, Debug)]
#[command(name = "edenred", version, about, long_about = None)]
pub struct Cli {
    /// Edenred username
    #[arg(long, env = "EDENRED_USERNAME")]
    pub username: Option<String>,

    /// Edenred password
    #[arg(long, env = "EDENRED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true, default_value = "text", env = "EDENRED_FORMAT")]
    pub format: OutputFormat,

    /// Override API base URL (for testing)
    #[arg(long, env = "EDENRED_BASE_URL")]
    pub base_url: Option<String>,

    /// Deadline for the whole lookup, e.g. 15s, 500ms, 1m
    #[arg(long, default_value = "15s", value_parser = parse_timeout)]
    pub timeout: Duration,
}

/// Longest accepted `--timeout`
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Parse `<n>ms`, `<n>s`, `<n>m` or a bare number of seconds.
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (digits, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => value.split_at(idx),
        None => (value, "s"),
    };

    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {:?}", value))?;
    let duration = match unit {
        "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.checked_mul(60).ok_or_else(too_long)?),
        _ => return Err(format!("unknown duration unit {:?} (use ms, s or m)", unit)),
    };

    if duration.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    if duration > MAX_TIMEOUT {
        return Err(too_long());
    }
    Ok(duration)
}

fn too_long() -> String {
    format!("timeout must be at most {}s", MAX_TIMEOUT.as_secs())
}
