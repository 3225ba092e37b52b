pub mod live_fight;

pub use live_fight::{FightCommand, LiveFightError, LiveFightHandle, LiveFightWorker};
