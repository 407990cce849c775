use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SMARTLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SMARTLINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SMARTLINK_STORAGE_BACKEND";
pub const SQLITE_URL_ENV: &str = "SMARTLINK_SQLITE_URL";
pub const SWEEP_INTERVAL_ENV: &str = "SMARTLINK_SWEEP_INTERVAL_SECS";
pub const CODE_LENGTH_ENV: &str = "SMARTLINK_CODE_LENGTH";
pub const LOG_FORMAT_ENV: &str = "SMARTLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://smartlink.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "smartlink", about = "URL shortener with expiring links")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin prepended to short codes in API responses.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_URL_ENV, default_value = DEFAULT_SQLITE_URL)]
    pub sqlite_url: String,

    #[arg(
        long,
        env = SWEEP_INTERVAL_ENV,
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub sweep_interval_secs: u64,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = smartlink_generator::random::DEFAULT_LENGTH)]
    pub code_length: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let cli = CLI::try_parse_from(["smartlink"]).unwrap();
        assert_eq!(cli.sweep_interval_secs, 60);
        assert_eq!(cli.code_length, 6);
        assert_eq!(cli.storage, StorageBackendArg::Sqlite);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        assert!(CLI::try_parse_from(["smartlink", "--sweep-interval-secs", "0"]).is_err());

        let cli = CLI::try_parse_from(["smartlink", "--sweep-interval-secs", "1"]).unwrap();
        assert_eq!(cli.sweep_interval_secs, 1);
    }
}
