//! Game state and the progression reducer.
//!
//! RULES:
//!   - `GameState` is a value. Transitions take it by reference and
//!     return a new one; nothing mutates a state in place.
//!   - The reducer does no I/O and draws no random numbers.
//!   - A rejected transition returns an error and no state.
//!
//! TRANSITION ORDER inside `apply_choice` (fixed, never reordered):
//!   1. bonus, fixed cost, then the rate on the running total
//!   2. history entry for the choice
//!   3. round counters; salary and expenses at a month boundary
//!   4. horizon checks (months, then rounds)
//!   5. capital floor check

use crate::{
    config::GameRules,
    error::{GameError, GameResult},
    scenario::Scenario,
    types::{Money, MonthIndex, OptionId, Round},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Setup,
    InRound,
    RoundResult,
    GameOver { win: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Round counter after this entry's transition: the seed entry is
    /// round 1 and the first choice is recorded as round 2.
    pub round: Round,
    pub month_label: String,
    pub month_round_index: Round,
    pub capital_after: Money,
    pub scenario_description: Option<String>,
    pub choice_text: Option<String>,
    pub result_text: Option<String>,
}

/// Salary and expenses applied when a month closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthSettlement {
    pub month_index: MonthIndex,
    pub salary_credited: Money,
    pub expenses_deducted: Money,
    pub next_salary: Money,
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    Continue,
    ShowRoundResult,
    MonthEnded(MonthSettlement),
    GameOver { win: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub directive: Directive,
    /// Set whenever the transition closed a month, including the final
    /// month of a game that the directive reports as over.
    pub settlement: Option<MonthSettlement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub capital: Money,
    pub current_round: Round,
    pub current_month_index: MonthIndex,
    pub current_month_round_index: Round,
    pub monthly_salary: Money,
    pub history: Vec<HistoryEntry>,
    pub is_over: bool,
    pub is_win: bool,
    pub phase: Phase,
    /// None until a game is started.
    pub rules: Option<GameRules>,
}

impl GameState {
    /// The pre-game state: no capital, no history.
    pub fn setup() -> Self {
        Self {
            capital: 0.0,
            current_round: 1,
            current_month_index: 0,
            current_month_round_index: 1,
            monthly_salary: 0.0,
            history: Vec::new(),
            is_over: false,
            is_win: false,
            phase: Phase::Setup,
            rules: None,
        }
    }

    pub fn rounds_played(&self) -> Round {
        self.history.len().saturating_sub(1) as Round
    }

    pub fn month_label(&self) -> String {
        self.rules
            .as_ref()
            .map(|r| r.calendar.label(self.current_month_index))
            .unwrap_or_default()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::setup()
    }
}

/// Parse a starting capital typed by the player.
pub fn parse_capital(input: &str) -> GameResult<Money> {
    let value: Money = input.trim().parse().map_err(|_| {
        GameError::invalid_input(format!("'{}' is not a valid starting amount", input.trim()))
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(GameError::invalid_input(format!(
            "starting amount must be a positive number, got {value}"
        )));
    }
    Ok(value)
}

pub fn start_game(initial_capital: Money, rules: GameRules) -> GameResult<GameState> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(GameError::invalid_input(format!(
            "starting amount must be a positive number, got {initial_capital}"
        )));
    }
    let expenses = rules.expenses.total();
    if expenses > initial_capital {
        return Err(GameError::invalid_input(format!(
            "monthly expenses {expenses:.2} exceed the starting amount {initial_capital:.2}"
        )));
    }

    let seed = HistoryEntry {
        round: 1,
        month_label: rules.calendar.label(0),
        month_round_index: 1,
        capital_after: initial_capital,
        scenario_description: None,
        choice_text: None,
        result_text: None,
    };

    log::info!(
        "game started: capital={initial_capital:.2} months={} rounds_per_month={} salary={:.2}",
        rules.months,
        rules.rounds_per_month,
        rules.starting_salary
    );

    Ok(GameState {
        capital: initial_capital,
        current_round: 1,
        current_month_index: 0,
        current_month_round_index: 1,
        monthly_salary: rules.starting_salary,
        history: vec![seed],
        is_over: false,
        is_win: false,
        phase: Phase::InRound,
        rules: Some(rules),
    })
}

pub fn apply_choice(state: &GameState, scenario: &Scenario, option_id: OptionId) -> GameResult<Transition> {
    if state.is_over {
        return Err(GameError::precondition("choice submitted after the game ended"));
    }
    if state.phase != Phase::InRound {
        return Err(GameError::precondition(format!(
            "choice submitted during {:?}",
            state.phase
        )));
    }
    let rules = state
        .rules
        .as_ref()
        .ok_or_else(|| GameError::precondition("choice submitted before the game started"))?;
    let option = scenario.option(option_id).ok_or_else(|| {
        GameError::precondition(format!(
            "option {option_id} does not belong to scenario {}",
            scenario.id
        ))
    })?;

    let mut next = state.clone();
    let mut capital = option.outcome.apply_to(state.capital);

    next.current_round += 1;
    next.history.push(HistoryEntry {
        round: next.current_round,
        month_label: rules.calendar.label(state.current_month_index),
        month_round_index: state.current_month_round_index,
        capital_after: capital,
        scenario_description: Some(scenario.description.clone()),
        choice_text: Some(option.text.clone()),
        result_text: Some(option.outcome.text.clone()),
    });

    let mut settlement = None;
    let mut over: Option<bool> = None;

    if state.current_month_round_index >= rules.rounds_per_month {
        let salary = state.monthly_salary;
        let expenses = rules.expenses.total();
        capital += salary;
        capital -= expenses;
        next.monthly_salary = salary * (1.0 + rules.salary_growth_rate);

        let closed = state.current_month_index;
        if closed + 1 >= rules.months {
            over = Some(capital > 0.0);
        } else {
            next.current_month_index += 1;
            next.current_month_round_index = 1;
        }

        log::debug!(
            "month {closed} closed: salary={salary:.2} expenses={expenses:.2} capital={capital:.2}"
        );
        settlement = Some(MonthSettlement {
            month_index: closed,
            salary_credited: salary,
            expenses_deducted: expenses,
            next_salary: next.monthly_salary,
        });
    } else {
        next.current_month_round_index += 1;
    }

    if over.is_none() {
        if let Some(max_rounds) = rules.max_rounds {
            if next.current_round - 1 >= max_rounds {
                over = Some(capital > 0.0);
            }
        }
    }

    if rules.loss_threshold.is_breached(capital) {
        over = Some(false);
    }

    next.capital = capital;
    let directive = match (over, settlement) {
        (Some(win), _) => {
            next.is_over = true;
            next.is_win = win;
            next.phase = Phase::GameOver { win };
            log::info!(
                "game over after {} rounds: win={win} capital={capital:.2}",
                next.rounds_played()
            );
            Directive::GameOver { win }
        }
        (None, Some(s)) => {
            next.phase = Phase::RoundResult;
            Directive::MonthEnded(s)
        }
        (None, None) => {
            next.phase = Phase::RoundResult;
            Directive::ShowRoundResult
        }
    };

    log::debug!(
        "round {} scenario={} option={option_id} capital {:.2} -> {capital:.2}",
        state.current_round,
        scenario.id,
        state.capital
    );

    Ok(Transition { state: next, directive, settlement })
}

/// Acknowledge a round result and return to the next decision.
pub fn continue_game(state: &GameState) -> GameResult<Transition> {
    if state.phase != Phase::RoundResult {
        return Err(GameError::precondition(format!(
            "continue requested during {:?}",
            state.phase
        )));
    }
    let mut next = state.clone();
    next.phase = Phase::InRound;
    Ok(Transition { state: next, directive: Directive::Continue, settlement: None })
}

/// Back to Setup from anywhere.
pub fn reset_game() -> GameState {
    GameState::setup()
}
