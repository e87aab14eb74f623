//! Snapshot serialization of full session state to and from JSON.
//!
//! A snapshot is taken at every month boundary and when a game ends.
//! It captures everything needed to resume a session without replaying
//! its choices: the deck the position points into, and how far the
//! event log had grown.

use crate::{scenario::Scenario, state::GameState, types::RunId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub run_id: RunId,
    pub deck: Vec<Scenario>,
    pub deck_position: usize,
    /// Newest event id of the run once the snapshot's transition was logged.
    pub last_event_id: Option<i64>,
    pub state: GameState,
}
