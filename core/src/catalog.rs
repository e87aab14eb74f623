//! Built-in scenario catalog.
//!
//! The authored scenarios live in data/scenarios/scenario_catalog.json and
//! are compiled into the crate. A catalog file of the same shape can be
//! loaded from disk to replace them.

use crate::{error::GameResult, scenario::Scenario};
use serde::Deserialize;

const BUILTIN_CATALOG: &str = include_str!("../../data/scenarios/scenario_catalog.json");

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    scenarios: Vec<Scenario>,
}

/// The compiled-in catalog, validated.
pub fn builtin_scenarios() -> GameResult<Vec<Scenario>> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Load a catalog file from disk.
pub fn load_catalog(path: &str) -> anyhow::Result<Vec<Scenario>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    Ok(parse_catalog(&content)?)
}

/// Authored content is held to the same schema as generated content, but
/// a bad entry here is an authoring bug and fails the whole catalog.
fn parse_catalog(content: &str) -> GameResult<Vec<Scenario>> {
    let file: CatalogFile = serde_json::from_str(content)?;
    for scenario in &file.scenarios {
        scenario.validate()?;
    }
    log::debug!("catalog loaded: {} scenarios", file.scenarios.len());
    Ok(file.scenarios)
}
