//! Month calendar: turns a month index into the label players see.

use crate::types::MonthIndex;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub start: NaiveDate,
}

impl MonthCalendar {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    /// "January 2025" for index 0 of a calendar starting January 2025.
    pub fn label(&self, month_index: MonthIndex) -> String {
        self.start
            .checked_add_months(Months::new(month_index))
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("Month {}", month_index + 1))
    }
}

impl Default for MonthCalendar {
    fn default() -> Self {
        Self::new(default_start_month())
    }
}

pub fn default_start_month() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("2025-01-01 is a valid date")
}
