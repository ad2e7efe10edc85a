use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "PINLINK_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "PINLINK_REDIS_URL";
pub const MYSQL_DSN_ENV: &str = "PINLINK_MYSQL_DSN";
pub const LOG_FORMAT_ENV: &str = "PINLINK_LOG_FORMAT";

pub const DEFAULT_EXPORT_DIR: &str = "public/s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "redis")]
    Redis,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Redis => write!(f, "redis"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pinlink", about = "Operate the pinlink short-link store")]
pub struct CLI {
    /// Backend holding the links; there is no default.
    #[arg(long, global = true, env = STORAGE_BACKEND_ENV, value_enum)]
    pub storage: StorageBackendArg,

    #[arg(long, global = true, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = MYSQL_DSN_ENV,
        hide_env_values = true,
        required_if_eq("storage", "mysql")
    )]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a static redirect document for every pinned, unexpired link.
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_DIR)]
        output: PathBuf,
    },
    /// Create the `links` table (mysql backend only).
    InitSchema,
    /// Include a link in static exports.
    Pin { slug: String },
    /// Exclude a link from static exports.
    Unpin { slug: String },
    /// Set or clear a link's expiration instant.
    #[command(group(ArgGroup::new("when").required(true).args(["at", "never"])))]
    Expire {
        slug: String,
        /// RFC 3339 instant, e.g. `2027-01-01T00:00:00Z`.
        #[arg(long)]
        at: Option<Timestamp>,
        #[arg(long)]
        never: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CLI::command().debug_assert();
    }

    #[test]
    fn export_defaults_to_public_s() {
        let cli = CLI::try_parse_from([
            "pinlink", "--storage", "redis", "--redis-url", "redis://127.0.0.1", "export",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::Redis);
        assert!(matches!(cli.command, Command::Export { output } if output == PathBuf::from("public/s")));
    }

    #[test]
    fn storage_backend_must_be_chosen() {
        if std::env::var_os(STORAGE_BACKEND_ENV).is_some() {
            return;
        }
        assert!(CLI::try_parse_from(["pinlink", "export"]).is_err());
        assert!(CLI::try_parse_from(["pinlink", "--storage", "in-memory", "export"]).is_err());
    }

    #[test]
    fn mysql_backend_requires_dsn() {
        let result = CLI::try_parse_from(["pinlink", "--storage", "mysql", "init-schema"]);
        assert!(result.is_err());
    }

    #[test]
    fn expire_needs_exactly_one_of_at_or_never() {
        let base = ["pinlink", "--storage", "mysql", "--mysql-dsn", "mysql://localhost/pinlink"];
        let parse = |extra: &[&str]| CLI::try_parse_from(base.iter().chain(extra));

        assert!(parse(&["expire", "abc"]).is_err());
        assert!(parse(&["expire", "abc", "--never", "--at", "2027-01-01T00:00:00Z"]).is_err());

        let cli = parse(&["expire", "abc", "--at", "2027-01-01T00:00:00Z"]).unwrap();
        let Command::Expire { at, never, .. } = cli.command else {
            panic!("expected expire");
        };
        assert_eq!(at, Some("2027-01-01T00:00:00Z".parse().unwrap()));
        assert!(!never);
    }
}
