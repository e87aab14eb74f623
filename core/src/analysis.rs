//! History analysis.
//!
//! An analyst reads a finished (or running) history and writes free-form
//! narrative. Game progression never depends on its output.

use crate::{error::GameResult, state::HistoryEntry};
use std::collections::BTreeSet;
use std::fmt::Write;

pub trait HistoryAnalyst {
    fn analyze(&self, history: &[HistoryEntry]) -> GameResult<String>;
}

/// Deterministic ledger report built from the history alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerAnalyst;

impl HistoryAnalyst for LedgerAnalyst {
    fn analyze(&self, history: &[HistoryEntry]) -> GameResult<String> {
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return Ok("No rounds played yet.".to_string());
        };

        let start = first.capital_after;
        let end = last.capital_after;
        let net = end - start;
        let pct = if start != 0.0 { net / start * 100.0 } else { 0.0 };

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Starting capital: ${start:.2}");
        let _ = writeln!(out, "Final capital:    ${end:.2}");
        let _ = writeln!(out, "Net change:       ${net:.2} ({pct:+.1}%)");

        // Per-round deltas. Month-end salary and expenses land between two
        // entries, so a delta can include them.
        let deltas: Vec<(&HistoryEntry, f64)> = history
            .windows(2)
            .map(|w| (&w[1], w[1].capital_after - w[0].capital_after))
            .collect();

        if let Some((entry, delta)) = deltas.iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
            let _ = writeln!(
                out,
                "Best round:       {} ({delta:+.2}) {}",
                entry.round,
                entry.choice_text.as_deref().unwrap_or("")
            );
        }
        if let Some((entry, delta)) = deltas.iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
            let _ = writeln!(
                out,
                "Worst round:      {} ({delta:+.2}) {}",
                entry.round,
                entry.choice_text.as_deref().unwrap_or("")
            );
        }

        let months: BTreeSet<&str> = history.iter().map(|e| e.month_label.as_str()).collect();
        let _ = writeln!(out, "Rounds played:    {}", history.len() - 1);
        let _ = write!(out, "Months touched:   {}", months.len());
        Ok(out)
    }
}
