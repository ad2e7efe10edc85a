mod cli;

use crate::cli::{Command, LogFormatArg, StorageBackendArg, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use pinlink_core::{LinkAdmin, Slug};
use pinlink_exporter::SnapshotExporter;
use pinlink_storage::{MySqlLinkStore, RedisLinkStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(storage_backend = %config.storage, "starting pinlink");

    match config.storage {
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .context("redis url is required when storage backend is redis")?;
            let store = RedisLinkStore::connect(&redis_url)
                .await
                .context("failed to connect to Redis")?;
            run(store, config.command).await
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(&mysql_dsn)
                .await
                .context("failed to connect to MySQL")?;
            if let Command::InitSchema = config.command {
                store
                    .ensure_schema()
                    .await
                    .context("failed to apply links schema")?;
                info!("links schema is in place");
                return Ok(());
            }
            run(store, config.command).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run<S: LinkAdmin>(store: S, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Export { output } => {
            let report = SnapshotExporter::new(store)
                .export(&output)
                .await
                .with_context(|| format!("failed to export into '{}'", output.display()))?;
            println!(
                "Exported {} static redirects ({} skipped)",
                report.written, report.skipped
            );
        }
        Command::InitSchema => bail!("init-schema is only supported with the mysql backend"),
        Command::Pin { slug } => update_pin(&store, &slug, true).await?,
        Command::Unpin { slug } => update_pin(&store, &slug, false).await?,
        Command::Expire { slug, at, never } => {
            let slug = parse_slug(&slug)?;
            let expires_at = if never { None } else { at };
            if !store.set_expiration(&slug, expires_at).await? {
                bail!("no link with slug '{slug}'");
            }
            match expires_at {
                Some(at) => info!(slug = %slug, expires_at = %at, "expiration set"),
                None => info!(slug = %slug, "expiration cleared"),
            }
        }
    }
    Ok(())
}

async fn update_pin<S: LinkAdmin>(store: &S, slug: &str, pinned: bool) -> anyhow::Result<()> {
    let slug = parse_slug(slug)?;
    if !store.set_pinned(&slug, pinned).await? {
        bail!("no link with slug '{slug}'");
    }
    info!(slug = %slug, pinned, "pin updated");
    Ok(())
}

fn parse_slug(raw: &str) -> anyhow::Result<Slug> {
    Slug::parse_syntax(raw.trim()).with_context(|| format!("'{raw}' is not a valid slug"))
}
