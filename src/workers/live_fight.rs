use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::db::FightStore;
use crate::models::{AdminAction, Fighter, ScoreUpdate, ServerMessage};
use crate::simulator::{BettingOdds, LiveFightState};

const COMMAND_BUFFER: usize = 32;
const BROADCAST_BUFFER: usize = 64;

/// Commands applied by the live fight worker, in arrival order
#[derive(Debug)]
pub enum FightCommand {
    Start {
        fighter1: Box<Fighter>,
        fighter2: Box<Fighter>,
    },
    UpdateScore {
        round: u8,
        fighter1_score: u32,
        fighter2_score: u32,
    },
    UpdateOdds(BettingOdds),
    End {
        method: Option<String>,
    },
    Snapshot(oneshot::Sender<LiveFightState>),

    /// Snapshot plus a receiver for everything published after it
    Subscribe(oneshot::Sender<(LiveFightState, broadcast::Receiver<ServerMessage>)>),
}

#[derive(Debug, thiserror::Error)]
pub enum LiveFightError {
    #[error("fighter {0} not found")]
    FighterNotFound(i64),

    #[error("live fight worker is not running")]
    WorkerStopped,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Cloneable front door to the live fight worker
#[derive(Clone)]
pub struct LiveFightHandle {
    commands: mpsc::Sender<FightCommand>,
    updates: broadcast::Sender<ServerMessage>,
}

impl LiveFightHandle {
    /// Receive every message published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.updates.subscribe()
    }

    /// Current state and a receiver that starts right after it
    pub async fn subscribe_with_snapshot(
        &self,
    ) -> Result<(LiveFightState, broadcast::Receiver<ServerMessage>), LiveFightError> {
        let (tx, rx) = oneshot::channel();
        self.send(FightCommand::Subscribe(tx)).await?;
        rx.await.map_err(|_| LiveFightError::WorkerStopped)
    }

    async fn send(&self, command: FightCommand) -> Result<(), LiveFightError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| LiveFightError::WorkerStopped)
    }

    pub async fn start_fight(&self, fighter1: Fighter, fighter2: Fighter) -> Result<(), LiveFightError> {
        self.send(FightCommand::Start {
            fighter1: Box::new(fighter1),
            fighter2: Box::new(fighter2),
        })
        .await
    }

    pub async fn update_score(
        &self,
        round: u8,
        fighter1_score: u32,
        fighter2_score: u32,
    ) -> Result<(), LiveFightError> {
        self.send(FightCommand::UpdateScore {
            round,
            fighter1_score,
            fighter2_score,
        })
        .await
    }

    pub async fn update_odds(&self, odds: BettingOdds) -> Result<(), LiveFightError> {
        self.send(FightCommand::UpdateOdds(odds)).await
    }

    pub async fn end_fight(&self, method: Option<String>) -> Result<(), LiveFightError> {
        self.send(FightCommand::End { method }).await
    }

    /// Current state as seen by the worker
    pub async fn snapshot(&self) -> Result<LiveFightState, LiveFightError> {
        let (tx, rx) = oneshot::channel();
        self.send(FightCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| LiveFightError::WorkerStopped)
    }

    /// Apply an admin action, resolving fighter ids through the store for a new fight
    pub async fn apply(&self, action: AdminAction, store: &FightStore) -> Result<(), LiveFightError> {
        match action {
            AdminAction::StartFight {
                fighter1_id,
                fighter2_id,
            } => {
                let fighter1 = store
                    .get_fighter(fighter1_id)
                    .await?
                    .ok_or(LiveFightError::FighterNotFound(fighter1_id))?;
                let fighter2 = store
                    .get_fighter(fighter2_id)
                    .await?
                    .ok_or(LiveFightError::FighterNotFound(fighter2_id))?;
                self.start_fight(fighter1, fighter2).await
            }
            AdminAction::UpdateScore {
                round,
                fighter1_score,
                fighter2_score,
            } => self.update_score(round, fighter1_score, fighter2_score).await,
            AdminAction::UpdateOdds(odds) => self.update_odds(odds).await,
            AdminAction::EndFight { method } => self.end_fight(method).await,
        }
    }
}

/// Worker that owns the live fight and ticks it once per interval
pub struct LiveFightWorker<R> {
    state: LiveFightState,
    rng: R,
    commands: mpsc::Receiver<FightCommand>,
    updates: broadcast::Sender<ServerMessage>,
    tick_interval: Duration,
    ticker: Option<Interval>,
}

impl<R: Rng + Send + 'static> LiveFightWorker<R> {
    /// Create a new idle worker and the handle used to drive it
    pub fn new(rng: R, tick_interval: Duration) -> (Self, LiveFightHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (update_tx, _) = broadcast::channel(BROADCAST_BUFFER);

        let worker = Self {
            state: LiveFightState::default(),
            rng,
            commands: command_rx,
            updates: update_tx.clone(),
            tick_interval,
            ticker: None,
        };
        let handle = LiveFightHandle {
            commands: command_tx,
            updates: update_tx,
        };

        (worker, handle)
    }

    /// Run the worker loop until every handle is dropped
    pub async fn run(mut self) {
        info!(
            "Live fight worker started (tick every {}ms)",
            self.tick_interval.as_millis()
        );

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = next_tick(&mut self.ticker) => self.tick(),
            }
        }

        warn!("Live fight command channel closed");
    }

    fn handle(&mut self, command: FightCommand) {
        match command {
            FightCommand::Start { fighter1, fighter2 } => {
                info!("Starting fight: {} vs {}", fighter1.name, fighter2.name);
                self.state = LiveFightState::start(*fighter1, *fighter2);

                let mut ticker = time::interval_at(
                    Instant::now() + self.tick_interval,
                    self.tick_interval,
                );
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);

                self.publish(ServerMessage::FightUpdate(Box::new(self.state.clone())));
            }
            FightCommand::UpdateScore {
                round,
                fighter1_score,
                fighter2_score,
            } => {
                if !self.state.set_round_score(round, fighter1_score, fighter2_score) {
                    warn!(
                        "Ignoring score update for round {} ({} - {})",
                        round, fighter1_score, fighter2_score
                    );
                    return;
                }
                self.publish(ServerMessage::ScoreUpdate(ScoreUpdate {
                    fighter1_score: self.state.fighter1_score,
                    fighter2_score: self.state.fighter2_score,
                }));
            }
            FightCommand::UpdateOdds(odds) => {
                self.state.set_odds(odds);
                self.publish(ServerMessage::OddsUpdate(self.state.betting_odds));
            }
            FightCommand::End { method } => {
                if !self.state.in_progress {
                    warn!("End fight requested but no fight is running");
                    return;
                }
                self.ticker = None;
                let result = self.state.finish(method);
                info!(
                    "Fight ended: {} by {} (round {}, {})",
                    result.winner, result.method, result.round, result.time
                );
                self.publish(ServerMessage::FightEnd(result));
            }
            FightCommand::Snapshot(reply) => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("Snapshot requester went away");
                }
            }
            FightCommand::Subscribe(reply) => {
                let receiver = self.updates.subscribe();
                if reply.send((self.state.clone(), receiver)).is_err() {
                    debug!("Subscriber went away");
                }
            }
        }
    }

    fn tick(&mut self) {
        for message in self.state.advance(&mut self.rng) {
            self.publish(message);
        }
        if !self.state.in_progress {
            self.ticker = None;
        }
    }

    /// Fan out to subscribers. Having none is not an error.
    fn publish(&self, message: ServerMessage) {
        if self.updates.send(message).is_err() {
            debug!("No live subscribers");
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::state::tests::fighter;
    use crate::simulator::ROUND_SECONDS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn_worker(tick: Duration) -> LiveFightHandle {
        let (worker, handle) = LiveFightWorker::new(StdRng::seed_from_u64(5), tick);
        tokio::spawn(worker.run());
        handle
    }

    #[tokio::test]
    async fn test_idle_snapshot() {
        let handle = spawn_worker(Duration::from_secs(60));
        let state = handle.snapshot().await.unwrap();
        assert!(!state.in_progress);
        assert!(state.fighter1.is_none());
        assert_eq!(state.betting_odds, BettingOdds::opening());
    }

    #[tokio::test]
    async fn test_start_then_end_is_draw() {
        let handle = spawn_worker(Duration::from_secs(60));
        let mut updates = handle.subscribe();

        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();
        match updates.recv().await.unwrap() {
            ServerMessage::FightUpdate(state) => {
                assert!(state.in_progress);
                assert_eq!(state.current_round, 1);
                assert_eq!(state.clock(), "5:00");
            }
            other => panic!("unexpected {:?}", other),
        }

        handle.end_fight(None).await.unwrap();
        match updates.recv().await.unwrap() {
            ServerMessage::FightEnd(result) => {
                assert_eq!(result.winner, "Draw");
                assert_eq!(result.method, "Decision");
                assert_eq!(result.round, 1);
                assert_eq!(result.time, "5:00");
            }
            other => panic!("unexpected {:?}", other),
        }

        let state = handle.snapshot().await.unwrap();
        assert!(!state.in_progress);
    }

    #[tokio::test]
    async fn test_ticks_flow_to_subscribers() {
        let handle = spawn_worker(Duration::from_millis(5));
        let mut updates = handle.subscribe();

        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();

        let mut clocks = Vec::new();
        while clocks.len() < 4 {
            if let ServerMessage::FightUpdate(state) = updates.recv().await.unwrap() {
                clocks.push(state.seconds_remaining);
            }
        }
        assert_eq!(clocks, vec![300, 299, 298, 297]);
    }

    #[tokio::test]
    async fn test_no_ticks_after_end() {
        let handle = spawn_worker(Duration::from_millis(5));
        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.end_fight(None).await.unwrap();

        let frozen = handle.snapshot().await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let later = handle.snapshot().await.unwrap();

        assert!(!later.in_progress);
        assert_eq!(frozen.seconds_remaining, later.seconds_remaining);
        assert_eq!(frozen.fighter_stats, later.fighter_stats);
    }

    #[tokio::test]
    async fn test_score_and_odds_updates() {
        let handle = spawn_worker(Duration::from_secs(60));
        let mut updates = handle.subscribe();
        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();
        let _ = updates.recv().await.unwrap();

        handle.update_score(9, 10, 10).await.unwrap();
        handle.update_score(2, 10, 9).await.unwrap();
        match updates.recv().await.unwrap() {
            ServerMessage::ScoreUpdate(update) => {
                assert_eq!(update.fighter1_score.round2, 10);
                assert_eq!(update.fighter2_score.round2, 9);
            }
            other => panic!("unexpected {:?}", other),
        }

        handle.update_odds(BettingOdds::from_probability(70)).await.unwrap();
        match updates.recv().await.unwrap() {
            ServerMessage::OddsUpdate(odds) => {
                assert_eq!(odds.fighter1.implied_probability, 70);
                assert_eq!(odds.total_probability(), 100);
            }
            other => panic!("unexpected {:?}", other),
        }

        handle.end_fight(Some("Submission".to_string())).await.unwrap();
        match updates.recv().await.unwrap() {
            ServerMessage::FightEnd(result) => {
                assert_eq!(result.winner, "Red");
                assert_eq!(result.method, "Submission");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subscription_continues_from_its_snapshot() {
        let handle = spawn_worker(Duration::from_millis(5));
        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let (snapshot, mut updates) = handle.subscribe_with_snapshot().await.unwrap();
        assert!(snapshot.seconds_remaining < ROUND_SECONDS);

        let mut previous = snapshot.seconds_remaining;
        let mut seen = 0;
        while seen < 3 {
            if let ServerMessage::FightUpdate(state) = updates.recv().await.unwrap() {
                assert_eq!(state.current_round, 1);
                assert_eq!(state.seconds_remaining + 1, previous);
                previous = state.seconds_remaining;
                seen += 1;
            }
        }
    }

    #[tokio::test]
    async fn test_worker_survives_oversized_scores() {
        let handle = spawn_worker(Duration::from_millis(5));
        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();

        handle.update_score(1, u32::MAX, 0).await.unwrap();
        handle.update_score(2, 1, 0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.end_fight(None).await.unwrap();

        let state = handle.snapshot().await.unwrap();
        assert!(!state.in_progress);
        assert!(state.fighter1_score.round1 < 1_000);
    }

    #[tokio::test]
    async fn test_restart_clears_previous_fight() {
        let handle = spawn_worker(Duration::from_secs(60));
        handle
            .start_fight(fighter(1, "Red", 40.0), fighter(2, "Blue", 40.0))
            .await
            .unwrap();
        handle.update_score(1, 10, 8).await.unwrap();
        handle
            .start_fight(fighter(3, "Green", 40.0), fighter(4, "Gold", 40.0))
            .await
            .unwrap();

        let state = handle.snapshot().await.unwrap();
        assert_eq!(state.fighter1_name(), "Green");
        assert_eq!(state.fighter1_score.total(), 0);
        assert_eq!(state.fighter2_score.total(), 0);
    }
}
