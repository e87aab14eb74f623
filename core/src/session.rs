//! The game session. Wires the reducer to a deck, a scenario source and
//! the session log.
//!
//! RULES:
//!   - Game rules live in state.rs. The session decides what to call and
//!     what to record, never how capital moves.
//!   - A transition is committed only after it has been logged. All of a
//!     transition's writes share one SQL transaction; if any fails, none
//!     land and the previous state stays current.
//!   - `restore` rewinds the log to the snapshot it resumes from.
//!   - Scenario refills happen on `continue_game`, when the deck wraps.

use crate::{
    analysis::HistoryAnalyst,
    catalog,
    command::PlayerCommand,
    config::{GameConfig, StartOptions},
    deck::ScenarioDeck,
    error::{GameError, GameResult},
    event::{EventLogEntry, GameEvent},
    scenario::Scenario,
    snapshot::GameSnapshot,
    source::ScenarioSource,
    state::{self, Directive, GameState, Phase, Transition},
    store::SessionStore,
    types::{OptionId, RunId},
};
use uuid::Uuid;

pub struct GameSession {
    run_id:  Option<RunId>,
    config:  GameConfig,
    deck:    ScenarioDeck,
    source:  Option<Box<dyn ScenarioSource>>,
    store:   SessionStore,
    state:   GameState,
}

impl GameSession {
    pub fn new(config: GameConfig, deck: ScenarioDeck, store: SessionStore) -> Self {
        Self {
            run_id: None,
            config,
            deck,
            source: None,
            store,
            state: GameState::setup(),
        }
    }

    /// Test config, built-in catalog, migrated in-memory store.
    pub fn build_test() -> GameResult<Self> {
        Self::build_test_with(GameConfig::default_test())
    }

    pub fn build_test_with(config: GameConfig) -> GameResult<Self> {
        let store = SessionStore::in_memory()?;
        store.migrate()?;
        let deck = ScenarioDeck::new(catalog::builtin_scenarios()?)?;
        Ok(Self::new(config, deck, store))
    }

    /// Refill the deck from `source` whenever it wraps.
    pub fn with_source(mut self, source: Box<dyn ScenarioSource>) -> Self {
        self.source = Some(source);
        self
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn deck(&self) -> &ScenarioDeck {
        &self.deck
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The scenario awaiting a decision, if a game is running.
    pub fn current_scenario(&self) -> Option<&Scenario> {
        match self.state.phase {
            Phase::Setup | Phase::GameOver { .. } => None,
            Phase::InRound | Phase::RoundResult => Some(self.deck.current()),
        }
    }

    // ── Transitions ────────────────────────────────────────────

    /// Begin a game from the player's typed starting capital.
    pub fn start(&mut self, capital_input: &str, options: &StartOptions) -> GameResult<&GameState> {
        if self.state.phase != Phase::Setup {
            return Err(GameError::precondition(format!(
                "start requested during {:?}; reset first",
                self.state.phase
            )));
        }
        let capital = state::parse_capital(capital_input)?;
        let rules = self.config.rules(options)?;
        let started = state::start_game(capital, rules)?;

        let run_id = format!("run-{}", Uuid::new_v4());
        self.store.atomically(|| {
            self.store.insert_run(&run_id, capital, env!("CARGO_PKG_VERSION"))?;
            self.record(&run_id, &started, &GameEvent::GameStarted {
                run_id:           run_id.clone(),
                capital,
                months:           started.rules.as_ref().map_or(0, |r| r.months),
                rounds_per_month: started.rules.as_ref().map_or(0, |r| r.rounds_per_month),
                monthly_salary:   started.monthly_salary,
            })?;
            self.store.insert_history(&run_id, 0, &started.history[0])
        })?;

        self.deck.seek(0);
        self.run_id = Some(run_id);
        self.state = started;
        Ok(&self.state)
    }

    /// Submit the player's choice for the current scenario.
    pub fn choose(&mut self, option_id: OptionId) -> GameResult<Directive> {
        let run_id = self
            .run_id
            .clone()
            .ok_or_else(|| GameError::precondition("choice submitted before the game started"))?;
        let scenario = self.deck.current();
        let transition = state::apply_choice(&self.state, scenario, option_id)?;
        let scenario_id = scenario.id;

        self.store
            .atomically(|| self.persist_choice(&run_id, scenario_id, option_id, &transition))?;

        let Transition { state, directive, .. } = transition;
        self.state = state;
        Ok(directive)
    }

    /// Acknowledge a round result and move to the next scenario.
    pub fn continue_game(&mut self) -> GameResult<Directive> {
        let transition = state::continue_game(&self.state)?;
        if self.deck.advance() {
            self.refill();
        }
        self.state = transition.state;
        Ok(transition.directive)
    }

    /// Back to Setup from any phase.
    pub fn reset(&mut self) {
        if let Some(run_id) = self.run_id.take() {
            if let Err(e) = self.record(&run_id, &self.state, &GameEvent::GameReset) {
                log::warn!("could not log reset for {run_id}: {e}");
            }
        }
        self.state = state::reset_game();
        self.deck.seek(0);
    }

    /// Start, choose and continue return a directive; reset does not.
    pub fn apply_command(&mut self, command: PlayerCommand) -> GameResult<Option<Directive>> {
        match command {
            PlayerCommand::Start { capital, months, hard_threshold } => {
                self.start(&capital, &StartOptions { months, hard_threshold })?;
                Ok(Some(Directive::Continue))
            }
            PlayerCommand::Choose { option_id } => self.choose(option_id).map(Some),
            PlayerCommand::Continue => self.continue_game().map(Some),
            PlayerCommand::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }

    /// Resume a run from its latest snapshot. Returns false when the run
    /// has none.
    ///
    /// Whatever the run logged after the snapshot is discarded, so play
    /// continues as if those rounds never happened. An active run is
    /// closed with a reset first.
    pub fn restore(&mut self, run_id: &str) -> GameResult<bool> {
        let Some((round, json)) = self.store.latest_snapshot(run_id)? else {
            return Ok(false);
        };
        let GameSnapshot { deck, deck_position, last_event_id, state, .. } =
            serde_json::from_str(&json)?;
        let mut deck = ScenarioDeck::new(deck)?;
        deck.seek(deck_position);

        self.store.atomically(|| {
            if let Some(active) = &self.run_id {
                self.record(active, &self.state, &GameEvent::GameReset)?;
            }
            self.store.truncate_run(run_id, last_event_id, state.history.len(), round)?;
            let stored = self.store.history_for_run(run_id)?;
            if stored.len() != state.history.len() {
                return Err(GameError::precondition(format!(
                    "{run_id} has {} history rows, its snapshot at round {round} has {}",
                    stored.len(),
                    state.history.len()
                )));
            }
            self.record(run_id, &state, &GameEvent::GameRestored { round })
        })?;

        self.deck = deck;
        self.state = state;
        self.run_id = Some(run_id.to_string());
        log::info!("restored {run_id} at round {round}");
        Ok(true)
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn analyze(&self, analyst: &dyn HistoryAnalyst) -> GameResult<String> {
        analyst.analyze(&self.state.history)
    }

    pub fn events(&self) -> GameResult<Vec<EventLogEntry>> {
        match &self.run_id {
            Some(run_id) => self.store.events_for_run(run_id),
            None => Ok(Vec::new()),
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn persist_choice(
        &self,
        run_id: &str,
        scenario_id: u32,
        option_id: OptionId,
        transition: &Transition,
    ) -> GameResult<()> {
        let next = &transition.state;
        let entry = next
            .history
            .last()
            .ok_or_else(|| GameError::precondition("transition produced no history entry"))?;

        self.record(run_id, next, &GameEvent::ChoiceApplied {
            round:          self.state.current_round,
            scenario_id,
            option_id,
            capital_before: self.state.capital,
            capital_after:  entry.capital_after,
        })?;
        self.store.insert_history(run_id, next.history.len() - 1, entry)?;

        if let Some(settlement) = transition.settlement {
            self.record(run_id, next, &GameEvent::MonthClosed {
                month_index:       settlement.month_index,
                salary_credited:   settlement.salary_credited,
                expenses_deducted: settlement.expenses_deducted,
                capital_after:     next.capital,
            })?;
        }
        if next.is_over {
            self.record(run_id, next, &GameEvent::GameEnded {
                is_win:        next.is_win,
                capital:       next.capital,
                rounds_played: next.rounds_played(),
            })?;
        }
        if transition.settlement.is_some() || next.is_over {
            self.take_snapshot(run_id, next)?;
        }
        Ok(())
    }

    fn refill(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let name = source.name();
        match source.fetch() {
            Ok(batch) => {
                let count = batch.len();
                if let Err(e) = self.deck.replace(batch) {
                    log::warn!("scenario source '{name}' returned an unusable batch: {e}");
                    return;
                }
                log::info!("deck refilled from '{name}': {count} scenarios");
                if let Some(run_id) = self.run_id.clone() {
                    let event = GameEvent::ScenariosRefilled { source: name.to_string(), count };
                    if let Err(e) = self.record(&run_id, &self.state, &event) {
                        log::warn!("could not log refill for {run_id}: {e}");
                    }
                }
            }
            Err(e) => log::warn!("scenario source '{name}' failed, cycling current deck: {e}"),
        }
    }

    fn record(&self, run_id: &str, at: &GameState, event: &GameEvent) -> GameResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     run_id.to_string(),
            round:      at.current_round,
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        self.store.append_event(&entry)
    }

    fn take_snapshot(&self, run_id: &str, at: &GameState) -> GameResult<()> {
        let snapshot = GameSnapshot {
            run_id:        run_id.to_string(),
            deck:          self.deck.scenarios().to_vec(),
            deck_position: self.deck.position(),
            last_event_id: self.store.last_event_id(run_id)?,
            state:         at.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.store.save_snapshot(run_id, at.current_round, &json)?;
        log::debug!("snapshot saved at round {}", at.current_round);
        Ok(())
    }
}
