//! The session event log.
//!
//! RULE: Every accepted choice emits a `choice_applied` event, followed by
//! `month_closed` and `game_ended` when it closed a month or the game.
//! Rejected transitions emit nothing.

use crate::types::{Money, MonthIndex, OptionId, Round, RunId, ScenarioId};
use serde::{Deserialize, Serialize};

/// Every event emitted during a session.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        run_id: RunId,
        capital: Money,
        months: u32,
        rounds_per_month: Round,
        monthly_salary: Money,
    },
    ChoiceApplied {
        round: Round,
        scenario_id: ScenarioId,
        option_id: OptionId,
        capital_before: Money,
        capital_after: Money,
    },
    MonthClosed {
        month_index: MonthIndex,
        salary_credited: Money,
        expenses_deducted: Money,
        capital_after: Money,
    },
    GameEnded {
        is_win: bool,
        capital: Money,
        rounds_played: Round,
    },
    GameReset,
    ScenariosRefilled {
        source: String,
        count: usize,
    },
    /// The run was rewound to its snapshot at `round`.
    GameRestored {
        round: Round,
    },
}

impl GameEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::GameStarted { .. }       => "game_started",
            Self::ChoiceApplied { .. }     => "choice_applied",
            Self::MonthClosed { .. }       => "month_closed",
            Self::GameEnded { .. }         => "game_ended",
            Self::GameReset                => "game_reset",
            Self::ScenariosRefilled { .. } => "scenarios_refilled",
            Self::GameRestored { .. }      => "game_restored",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub round: Round,
    pub event_type: String,
    pub payload: String, // JSON-serialized GameEvent
}
