use crate::types::{Money, OptionId};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// `capital` is the raw text typed by the player.
    Start {
        capital: String,
        #[serde(default)]
        months: Option<u32>,
        #[serde(default)]
        hard_threshold: Option<Money>,
    },
    Choose {
        option_id: OptionId,
    },
    Continue,
    Reset,
}
