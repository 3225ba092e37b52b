use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path
    pub database_url: String,

    /// Address the HTTP/WebSocket server listens on
    pub bind_addr: String,

    /// Simulator tick cadence
    pub tick_interval: Duration,

    /// Local roster seed file
    pub roster_path: String,

    /// Remote roster, used by the importer when set
    pub roster_url: Option<String>,

    /// Start fighters 1 vs 2 shortly after boot
    pub demo_fight: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let tick_ms: u64 = env::var("TICK_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .context("TICK_INTERVAL_MS must be a valid number")?;

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/fights.db".to_string()),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),

            tick_interval: Duration::from_millis(tick_ms.max(1)),

            roster_path: env::var("ROSTER_PATH")
                .unwrap_or_else(|_| "data/roster.json".to_string()),

            roster_url: env::var("ROSTER_URL").ok().filter(|url| !url.trim().is_empty()),

            demo_fight: env::var("DEMO_FIGHT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("DEMO_FIGHT must be true or false")?,
        })
    }
}
