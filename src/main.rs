use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fight_oracle::api::{build_router, AppState};
use fight_oracle::config::Config;
use fight_oracle::db::FightStore;
use fight_oracle::models::AdminAction;
use fight_oracle::roster::{import_fighters, load_roster_file};
use fight_oracle::workers::{LiveFightHandle, LiveFightWorker};

const DEMO_FIGHT_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fight_oracle=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fight-oracle");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize database
    let store = Arc::new(FightStore::new(&config.database_url).await?);
    info!("Database initialized");

    seed_roster(&store, &config.roster_path).await?;

    // Live fight worker
    let (live_worker, live) = LiveFightWorker::new(StdRng::from_entropy(), config.tick_interval);
    let live_handle = tokio::spawn(async move {
        live_worker.run().await;
    });

    if config.demo_fight {
        tokio::spawn(start_demo_fight(live.clone(), Arc::clone(&store)));
    }

    let app = build_router(AppState {
        store: Arc::clone(&store),
        live,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = live_handle => {
            error!("Live fight worker exited unexpectedly: {:?}", result);
        }
        result = server_handle => {
            error!("HTTP server exited unexpectedly: {:?}", result);
        }
    }

    info!("Shutting down fight-oracle");
    Ok(())
}

/// Load the roster file into an empty database
async fn seed_roster(store: &FightStore, roster_path: &str) -> Result<()> {
    if store.fighter_count().await? > 0 {
        return Ok(());
    }

    let path = Path::new(roster_path);
    if !path.exists() {
        info!("No roster file at {}, starting with an empty roster", roster_path);
        return Ok(());
    }

    let fighters = load_roster_file(path)?;
    import_fighters(store, fighters).await?;
    Ok(())
}

/// Start fighters 1 and 2 shortly after boot
async fn start_demo_fight(live: LiveFightHandle, store: Arc<FightStore>) {
    tokio::time::sleep(DEMO_FIGHT_DELAY).await;

    let action = AdminAction::StartFight {
        fighter1_id: 1,
        fighter2_id: 2,
    };
    match live.apply(action, &store).await {
        Ok(()) => info!("Demo fight started"),
        Err(e) => warn!("Could not start demo fight: {}", e),
    }
}
