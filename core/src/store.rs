//! SQLite session log.
//!
//! RULE: Only store.rs talks to the database.
//! The session calls store methods; the reducer never sees SQL.

use crate::{
    error::GameResult,
    event::EventLogEntry,
    state::HistoryEntry,
    types::Round,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (or create) the session database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn.execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Run `f` inside one SQL transaction. An error from `f` rolls back
    /// every write it made.
    pub fn atomically<T>(&self, f: impl FnOnce() -> GameResult<T>) -> GameResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f()?;
        tx.commit()?;
        Ok(value)
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, initial_capital: f64, version: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, initial_capital, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, initial_capital, version, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn run_count(&self) -> GameResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, round, event_type, payload) VALUES (?1, ?2, ?3, ?4)",
            params![entry.run_id, entry.round, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> GameResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, round, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    round:      row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Id of the newest event logged for `run_id`.
    pub fn last_event_id(&self, run_id: &str) -> GameResult<Option<i64>> {
        Ok(self.conn.query_row(
            "SELECT MAX(id) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?)
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> GameResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?)
    }

    // ── History ────────────────────────────────────────────────

    pub fn insert_history(&self, run_id: &str, seq: usize, entry: &HistoryEntry) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO history (run_id, seq, round, month_label, month_round_index,
                                  capital_after, scenario_description, choice_text, result_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                seq as i64,
                entry.round,
                entry.month_label,
                entry.month_round_index,
                entry.capital_after,
                entry.scenario_description,
                entry.choice_text,
                entry.result_text,
            ],
        )?;
        Ok(())
    }

    pub fn history_for_run(&self, run_id: &str) -> GameResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT round, month_label, month_round_index, capital_after,
                    scenario_description, choice_text, result_text
             FROM history WHERE run_id = ?1
             ORDER BY seq ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(HistoryEntry {
                    round:                row.get(0)?,
                    month_label:          row.get(1)?,
                    month_round_index:    row.get(2)?,
                    capital_after:        row.get(3)?,
                    scenario_description: row.get(4)?,
                    choice_text:          row.get(5)?,
                    result_text:          row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Drop what a run logged after one of its snapshots: events newer
    /// than `last_event_id`, history from `history_len` on, and later
    /// snapshots.
    pub fn truncate_run(
        &self,
        run_id: &str,
        last_event_id: Option<i64>,
        history_len: usize,
        round: Round,
    ) -> GameResult<()> {
        self.conn.execute(
            "DELETE FROM event_log WHERE run_id = ?1 AND id > ?2",
            params![run_id, last_event_id.unwrap_or(0)],
        )?;
        self.conn.execute(
            "DELETE FROM history WHERE run_id = ?1 AND seq >= ?2",
            params![run_id, history_len as i64],
        )?;
        self.conn.execute(
            "DELETE FROM snapshot WHERE run_id = ?1 AND round > ?2",
            params![run_id, round],
        )?;
        Ok(())
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, round: Round, state_json: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshot (run_id, round, state_json) VALUES (?1, ?2, ?3)",
            params![run_id, round, state_json],
        )?;
        Ok(())
    }

    pub fn latest_snapshot(&self, run_id: &str) -> GameResult<Option<(Round, String)>> {
        let result = self
            .conn
            .query_row(
                "SELECT round, state_json FROM snapshot
                 WHERE run_id = ?1
                 ORDER BY round DESC LIMIT 1",
                params![run_id],
                |row| Ok((row.get::<_, Round>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        Ok(result)
    }
}
