//! The ordered, cycling list of scenarios served to the player.
//!
//! Running off the end is not an error: the deck wraps to the first
//! scenario and reports the wrap so the session can ask a source for a
//! fresh batch.

use crate::{
    error::{GameError, GameResult},
    rng::{GameRng, StreamSlot},
    scenario::Scenario,
    types::ScenarioId,
};

#[derive(Debug, Clone)]
pub struct ScenarioDeck {
    scenarios: Vec<Scenario>,
    position: usize,
}

impl ScenarioDeck {
    pub fn new(scenarios: Vec<Scenario>) -> GameResult<Self> {
        if scenarios.is_empty() {
            return Err(GameError::invalid_input("scenario deck needs at least one scenario"));
        }
        Ok(Self { scenarios, position: 0 })
    }

    pub fn current(&self) -> &Scenario {
        &self.scenarios[self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Move to the next scenario. Returns true when the deck wrapped.
    pub fn advance(&mut self) -> bool {
        self.position = (self.position + 1) % self.scenarios.len();
        self.position == 0
    }

    /// Jump to a position, e.g. when restoring a snapshot.
    pub fn seek(&mut self, position: usize) {
        self.position = position % self.scenarios.len();
    }

    /// Install a fresh batch and start from its first scenario.
    pub fn replace(&mut self, scenarios: Vec<Scenario>) -> GameResult<()> {
        *self = Self::new(scenarios)?;
        Ok(())
    }

    pub fn shuffle(&mut self, seed: u64) {
        GameRng::new(seed, StreamSlot::DeckShuffle).shuffle(&mut self.scenarios);
        self.position = 0;
    }

    pub fn find(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}
