//! Process configuration.
//!
//! Sources, lowest priority first: built-in defaults, `BOSS_*` environment
//! variables, command-line flags.

use crate::error::BossError;
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen address.
    pub addr: String,
    /// SQLite data source name.
    pub dsn: String,
    /// Directory holding `html/` templates and `static/` assets.
    pub ui_dir: PathBuf,
    pub loglevel: String,
    /// Seconds in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8300".to_string(),
            dsn: "sqlite://boss.db".to_string(),
            ui_dir: PathBuf::from("./ui"),
            loglevel: "info".to_string(),
            shutdown_timeout: 60,
        }
    }
}

/// Command-line flags. Unset flags leave lower-priority sources in place.
#[derive(Debug, Default, Parser, Serialize)]
#[command(name = "boss-admin")]
#[command(about = "BOSS administration web server")]
pub struct Cli {
    /// HTTP network address [default: 0.0.0.0:8300]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,

    /// SQLite data source name [default: sqlite://boss.db]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,

    /// Directory with html templates and static assets [default: ./ui]
    #[arg(long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset [default: info]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loglevel: Option<String>,

    /// Graceful shutdown deadline in seconds [default: 60]
    #[arg(long, value_name = "SECS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_timeout: Option<u64>,
}

impl Config {
    pub fn figment(cli: &Cli) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("BOSS_"))
            .merge(Serialized::defaults(cli))
    }

    pub fn load(cli: &Cli) -> Result<Self, BossError> {
        Ok(Self::figment(cli).extract()?)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "boss-admin",
            "--addr",
            "127.0.0.1:9000",
            "--shutdown-timeout",
            "5",
        ]);
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::defaults(&cli))
            .extract()
            .unwrap();

        assert_eq!(cfg.addr, "127.0.0.1:9000");
        assert_eq!(cfg.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.dsn, Config::default().dsn);
        assert_eq!(cfg.templates_dir(), PathBuf::from("./ui").join("html"));
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::defaults(Cli::default()))
            .extract()
            .unwrap();
        assert_eq!(cfg, Config::default());
    }
}
