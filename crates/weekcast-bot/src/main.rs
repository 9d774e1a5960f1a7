use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use weekcast_core::WeekcastConfig;
use weekcast_scheduler::DispatchEngine;
use weekcast_store::PostStore;

mod commands;
mod webhook;

#[derive(Parser)]
#[command(name = "weekcast", about = "Weekly post scheduler and dispatcher")]
struct Cli {
    /// Config file path (default: ./weekcast.toml; WEEKCAST_* env vars override).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the dispatch service until Ctrl-C.
    Run,
    /// Add a weekly post.
    Add {
        /// Message body, sent verbatim.
        #[arg(long)]
        content: String,
        /// 0 = Monday … 6 = Sunday.
        #[arg(long)]
        day_of_week: u8,
        /// Hour of day, 0-23 UTC.
        #[arg(long)]
        hour: u8,
        /// Minute of the hour; must be 0 or 30.
        #[arg(long, default_value_t = 0)]
        minute: u8,
    },
    /// List all weekly posts.
    List,
    /// Remove a weekly post by ID.
    Remove { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weekcast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = WeekcastConfig::load(cli.config.as_deref())?;

    info!(path = %config.database.path, "opening SQLite database");
    let conn = rusqlite::Connection::open(&config.database.path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    let store = PostStore::new(conn)?;

    match cli.command {
        Command::Run => run(config, store).await?,
        Command::Add {
            content,
            day_of_week,
            hour,
            minute,
        } => println!("{}", commands::add(&store, &content, day_of_week, hour, minute)),
        Command::List => println!("{}", commands::list(&store)),
        Command::Remove { id } => println!("{}", commands::remove(&store, id)),
    }
    Ok(())
}

/// Start the dispatch engine and block until Ctrl-C.
async fn run(config: WeekcastConfig, store: PostStore) -> anyhow::Result<()> {
    // The output channel is resolved once here; every tick reuses it.
    let publisher = Arc::new(webhook::WebhookPublisher::new(
        config.channel.webhook_url.clone(),
    ));
    let engine = DispatchEngine::new(Arc::new(store), publisher);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine_task = tokio::spawn(engine.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("ctrl-c received, shutting down");
    let _ = shutdown_tx.send(true);
    let _ = engine_task.await;
    Ok(())
}
