//! Scenario model and boundary validation.
//!
//! RULE: Nothing reaches the reducer without passing `Scenario::validate`.
//! Scenario text from a generator is untrusted until it has been decoded
//! here; authored catalog content goes through the same gate.

use crate::{
    error::{GameError, GameResult},
    types::{Money, OptionId, ScenarioId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The numeric and narrative consequence bound to one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Outcome {
    pub text: String,
    /// Fractional multiplier applied to the running total, e.g. 0.07.
    pub capital_change: f64,
    /// Subtracted as authored. A negative cost raises capital.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<Money>,
}

impl Outcome {
    /// Bonus first, then fixed cost, then the rate on the running total.
    /// The order is part of the game's numeric contract.
    pub fn apply_to(&self, capital: Money) -> Money {
        let mut next = capital;
        if let Some(bonus) = self.bonus.filter(|b| *b != 0.0) {
            next += bonus;
        }
        if let Some(cost) = self.fixed_cost.filter(|c| *c != 0.0) {
            next -= cost;
        }
        next += next * self.capital_change;
        next
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioOption {
    pub id: OptionId,
    pub text: String,
    pub outcome: Outcome,
}

/// A single decision point presented to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub id: ScenarioId,
    pub category: String,
    pub description: String,
    pub options: Vec<ScenarioOption>,
}

impl Scenario {
    pub fn option(&self, option_id: OptionId) -> Option<&ScenarioOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn validate(&self) -> GameResult<()> {
        let reject = |reason: String| GameError::InvalidScenario {
            scenario_id: self.id,
            reason,
        };

        if self.description.trim().is_empty() {
            return Err(reject("description is empty".into()));
        }
        if self.options.is_empty() {
            return Err(reject("no options".into()));
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.id) {
                return Err(reject(format!("duplicate option id {}", option.id)));
            }
            let outcome = &option.outcome;
            if !outcome.capital_change.is_finite() {
                return Err(reject(format!("option {}: capitalChange is not finite", option.id)));
            }
            if let Some(cost) = outcome.fixed_cost {
                if !cost.is_finite() {
                    return Err(reject(format!("option {}: fixedCost is not finite", option.id)));
                }
            }
            if let Some(bonus) = outcome.bonus {
                if !bonus.is_finite() || bonus < 0.0 {
                    return Err(reject(format!(
                        "option {}: bonus must be a non-negative amount, got {bonus}",
                        option.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Decode a JSON array of scenarios, as emitted by a text generator.
///
/// Each element is decoded and validated on its own; malformed entries are
/// dropped with a warning. Fails only when the text is not a JSON array or
/// when no entry survives.
pub fn parse_scenarios(text: &str) -> GameResult<Vec<Scenario>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(strip_code_fence(text))?;
    let total = raw.len();

    let mut accepted = Vec::with_capacity(total);
    for (index, value) in raw.into_iter().enumerate() {
        let scenario: Scenario = match serde_json::from_value(value) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("generated scenario #{index} rejected: {e}");
                continue;
            }
        };
        match scenario.validate() {
            Ok(()) => accepted.push(scenario),
            Err(e) => log::warn!("generated scenario #{index} rejected: {e}"),
        }
    }

    if accepted.is_empty() {
        return Err(GameError::InvalidScenario {
            scenario_id: 0,
            reason: format!("none of {total} generated scenarios passed validation"),
        });
    }
    log::debug!("accepted {}/{total} generated scenarios", accepted.len());
    Ok(accepted)
}

/// Generators tend to wrap JSON in a ```json fenced block.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_is_stripped() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  [] "), "[]");
    }

    #[test]
    fn zero_bonus_and_cost_are_ignored() {
        let outcome = Outcome {
            text: "flat".into(),
            capital_change: 0.1,
            fixed_cost: Some(0.0),
            bonus: Some(0.0),
        };
        assert!((outcome.apply_to(100.0) - 110.0).abs() < 1e-9);
    }
}
