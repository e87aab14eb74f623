//! WealthQuest core: a personal-finance decision game.
//!
//! A player starts with some capital and works through scenario rounds
//! grouped into months. Each choice moves capital; each month end credits
//! salary and deducts expenses. `state` holds the reducer, `session`
//! drives it against a scenario deck and the SQLite session log.

pub mod analysis;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod deck;
pub mod error;
pub mod event;
pub mod expenses;
pub mod planning;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod store;
pub mod types;
