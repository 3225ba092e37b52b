use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::db::FightStore;
use crate::models::{FighterStats, NewFighter};
use crate::scoring::format_fighter_profile;

/// Client for a remote JSON roster (an array of fighters)
pub struct RosterClient {
    client: Client,
    url: String,
}

impl RosterClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    /// Download the roster. A non-success status yields an empty roster.
    pub async fn fetch_roster(&self) -> Result<Vec<NewFighter>> {
        debug!("Fetching roster from: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch roster")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Roster source error: {} - {}", status, text);
            return Ok(Vec::new());
        }

        let fighters: Vec<NewFighter> = response
            .json()
            .await
            .context("Failed to parse roster response")?;

        info!("Fetched {} fighters from {}", fighters.len(), self.url);
        Ok(fighters)
    }
}

/// Read a roster in the same format from disk
pub fn load_roster_file(path: &Path) -> Result<Vec<NewFighter>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file {}", path.display()))?;
    let fighters: Vec<NewFighter> =
        serde_json::from_str(&content).context("Failed to parse roster file")?;

    info!("Loaded {} fighters from {}", fighters.len(), path.display());
    Ok(fighters)
}

/// Key used to detect fighters already on the roster
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Counts from one import run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert every fighter whose name is not already present
pub async fn import_fighters(store: &FightStore, fighters: Vec<NewFighter>) -> Result<ImportSummary> {
    let mut known: HashSet<String> = store
        .get_fighters()
        .await?
        .iter()
        .map(|f| normalize_name(&f.name))
        .collect();

    let mut summary = ImportSummary::default();
    for fighter in fighters {
        if !known.insert(normalize_name(&fighter.name)) {
            debug!("Skipping {}, already on the roster", fighter.name);
            summary.skipped += 1;
            continue;
        }

        let stored = store.insert_fighter(&fighter).await?;
        debug!("{}", format_fighter_profile(&FighterStats::from(&stored)));
        summary.inserted += 1;
    }

    info!(
        "Roster import finished: {} inserted, {} skipped",
        summary.inserted, summary.skipped
    );
    Ok(summary)
}
