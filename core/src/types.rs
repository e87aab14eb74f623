//! Shared primitive types used across the entire game.

/// A round counter. One round = one scenario decision.
pub type Round = u32;

/// Zero-based month index within a game.
pub type MonthIndex = u32;

/// Identifier of a scenario, and of an option within its scenario.
pub type ScenarioId = u32;
pub type OptionId = u32;

/// The canonical run identifier.
pub type RunId = String;

/// A monetary amount in dollars.
pub type Money = f64;
