//! helpdesk — a terminal client for a help desk ticket service.

use clap::Parser;
use tracing::warn;

use helpdesk::app;
use helpdesk::config::{Config, RefreshPolicy};
use helpdesk::logging;

#[derive(Debug, Parser)]
#[command(name = "helpdesk", version, about = "A terminal client for a help desk ticket service")]
struct Cli {
    /// Ticket service base URL (overrides the configured value).
    #[arg(long)]
    server: Option<String>,

    /// Render policy for the ticket list.
    #[arg(long, value_enum)]
    refresh: Option<RefreshPolicy>,

    /// Clear the persisted ticket snapshot before starting.
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init()?;

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config, using defaults");
        Config::default()
    });
    if let Some(server) = cli.server {
        config.settings.server_url = server;
    }
    if let Some(refresh) = cli.refresh {
        config.settings.refresh = refresh;
    }
    config.validate()?;

    let result = app::run(config, cli.no_cache).await;

    logging::shutdown();
    result.map_err(|e| anyhow::anyhow!(e.user_message()))
}
