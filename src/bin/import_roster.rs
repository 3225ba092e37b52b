use std::env;
use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fight_oracle::config::Config;
use fight_oracle::db::FightStore;
use fight_oracle::roster::{import_fighters, load_roster_file, RosterClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "import_roster=info,fight_oracle=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // An explicit path argument wins over ROSTER_URL
    let args: Vec<String> = env::args().collect();
    let fighters = match (args.get(1), &config.roster_url) {
        (Some(path), _) => load_roster_file(Path::new(path))?,
        (None, Some(url)) => RosterClient::new(url).fetch_roster().await?,
        (None, None) => load_roster_file(Path::new(&config.roster_path))?,
    };

    let store = FightStore::new(&config.database_url).await?;
    let summary = import_fighters(&store, fighters).await?;

    info!(
        "Done: {} fighters added, {} already present, {} on the roster",
        summary.inserted,
        summary.skipped,
        store.fighter_count().await?
    );
    Ok(())
}
