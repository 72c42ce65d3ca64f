use anyhow::{Context, Result};
use tracing::info;

use rsvp_engine::config::Config;
use rsvp_engine::context::EngineContext;
use rsvp_engine::logging::init_logging;

mod cli;

use cli::{CliOptions, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let command = CliOptions::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);

    info!("Starting RSVP engine v{}", env!("CARGO_PKG_VERSION"));

    let ctx = EngineContext::connect(&config)
        .await
        .context("Failed to connect to database")?;

    match command {
        Command::Migrate(_) => {
            info!("Running database migrations...");
            ctx.migrate().await?;
            info!("Migrations completed");
        }
        Command::Party(cmd) => {
            let summary = ctx.engine.get_party_summary(cmd.party_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Guest(cmd) => {
            let view = ctx.engine.get_guest_view(cmd.rsvp_id).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}
