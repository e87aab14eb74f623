//! Scenario sources.
//!
//! RULE: A source only supplies scenarios. It never sees or touches game
//! state, and a failed fetch leaves the session cycling its current deck.

use crate::{
    catalog,
    error::{GameError, GameResult},
    scenario::{parse_scenarios, Scenario},
};

/// The contract every scenario supplier must fulfill.
pub trait ScenarioSource {
    /// Unique stable name for this source.
    fn name(&self) -> &'static str;

    /// Produce a fresh, validated, non-empty batch.
    fn fetch(&mut self) -> GameResult<Vec<Scenario>>;
}

/// Serves a fixed catalog, the same batch every time.
pub struct CatalogSource {
    scenarios: Vec<Scenario>,
}

impl CatalogSource {
    pub fn builtin() -> GameResult<Self> {
        Ok(Self { scenarios: catalog::builtin_scenarios()? })
    }

    /// A fixed batch held to the same rules as the built-in catalog.
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> GameResult<Self> {
        if scenarios.is_empty() {
            return Err(GameError::invalid_input("catalog source needs at least one scenario"));
        }
        for scenario in &scenarios {
            scenario.validate()?;
        }
        Ok(Self { scenarios })
    }
}

impl ScenarioSource for CatalogSource {
    fn name(&self) -> &'static str { "catalog" }

    fn fetch(&mut self) -> GameResult<Vec<Scenario>> {
        Ok(self.scenarios.clone())
    }
}

/// Wraps a text oracle (e.g. a generative-language client) whose output
/// is a JSON array of scenarios. The raw text is validated on every fetch.
pub struct GeneratedSource<F>
where
    F: FnMut() -> GameResult<String>,
{
    oracle: F,
}

impl<F> GeneratedSource<F>
where
    F: FnMut() -> GameResult<String>,
{
    pub fn new(oracle: F) -> Self {
        Self { oracle }
    }
}

impl<F> ScenarioSource for GeneratedSource<F>
where
    F: FnMut() -> GameResult<String>,
{
    fn name(&self) -> &'static str { "generated" }

    fn fetch(&mut self) -> GameResult<Vec<Scenario>> {
        let text = (self.oracle)()?;
        parse_scenarios(&text)
    }
}
