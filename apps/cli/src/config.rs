use std::path::PathBuf;

use crate::cli::Cli;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Runtime configuration, read from the environment and overridden by flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub persist_discovered: bool,
    pub log_format: String,
    pub fixture: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_blank("CHARMS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            persist_discovered: non_blank("CHARMS_PERSIST_DISCOVERED")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            log_format: non_blank("CHARMS_LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
            fixture: non_blank("CHARMS_FIXTURE").map(PathBuf::from),
        }
    }

    /// Command-line flags win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(path) = &cli.fixture {
            self.fixture = Some(path.clone());
        }
        if cli.no_persist {
            self.persist_discovered = false;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
