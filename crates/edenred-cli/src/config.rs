//! Validated runtime configuration built from command-line arguments.
//!
//! Nothing here touches the network; every check runs before the first
//! request so bad input fails fast as a usage error.

use std::time::Duration;

use edenred_core::Credentials;
use thiserror::Error;
use tokio::time::Instant;

use crate::cli::Cli;
use crate::output::OutputFormat;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("invalid base URL {0:?}: must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("timeout {0:?} is too large")]
    InvalidTimeout(Duration),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub format: OutputFormat,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, UsageError> {
        let credentials = Credentials::new(
            cli.username.unwrap_or_default(),
            cli.password.unwrap_or_default(),
        );
        if !credentials.is_complete() {
            return Err(UsageError::MissingCredentials);
        }

        let base_url = cli.base_url.filter(|url| !url.trim().is_empty());
        if let Some(ref url) = base_url {
            let url = url.trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(UsageError::InvalidBaseUrl(url.to_string()));
            }
        }

        Ok(Self {
            credentials,
            format: cli.format,
            base_url,
            timeout: cli.timeout,
        })
    }

    /// Absolute deadline for a lookup starting now.
    pub fn deadline(&self) -> Result<Instant, UsageError> {
        Instant::now()
            .checked_add(self.timeout)
            .ok_or(UsageError::InvalidTimeout(self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(username: Option<&str>, password: Option<&str>) -> Cli {
        Cli {
            username: username.map(String::from),
            password: password.map(String::from),
            format: OutputFormat::Text,
            base_url: None,
            timeout: Duration::from_secs(15),
        }
    }

    #[test]
    fn test_from_cli() {
        let config = Config::from_cli(cli(Some("user"), Some("pass"))).expect("Expected config");
        assert_eq!(config.credentials.username(), "user");
        assert_eq!(config.credentials.password(), "pass");
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_missing_credentials() {
        for (username, password) in [
            (None, Some("pass")),
            (Some("user"), None),
            (Some(""), Some("pass")),
            (Some("user"), Some("")),
            (None, None),
        ] {
            assert_eq!(
                Config::from_cli(cli(username, password)).unwrap_err(),
                UsageError::MissingCredentials
            );
        }
    }

    #[test]
    fn test_deadline() {
        let config = Config::from_cli(cli(Some("user"), Some("pass"))).expect("Expected config");
        let before = Instant::now();
        let deadline = config.deadline().expect("Expected deadline");
        assert!(deadline >= before + Duration::from_secs(15));

        let mut config = config;
        config.timeout = Duration::MAX;
        assert_eq!(
            config.deadline().unwrap_err(),
            UsageError::InvalidTimeout(Duration::MAX)
        );
    }

    #[test]
    fn test_base_url_validation() {
        let mut args = cli(Some("user"), Some("pass"));
        args.base_url = Some("localhost:8080".to_string());
        assert!(matches!(
            Config::from_cli(args).unwrap_err(),
            UsageError::InvalidBaseUrl(_)
        ));

        let mut args = cli(Some("user"), Some("pass"));
        args.base_url = Some("   ".to_string());
        assert_eq!(Config::from_cli(args).expect("Expected config").base_url, None);

        let mut args = cli(Some("user"), Some("pass"));
        args.base_url = Some("http://127.0.0.1:9000/".to_string());
        assert_eq!(
            Config::from_cli(args).expect("Expected config").base_url.as_deref(),
            Some("http://127.0.0.1:9000/")
        );
    }
}
