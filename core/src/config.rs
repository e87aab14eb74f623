use crate::{
    clock::{default_start_month, MonthCalendar},
    error::{GameError, GameResult},
    expenses::{monthly_take_home, MonthlyExpenses, RegionCode},
    types::{Money, Round},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUNDS_PER_MONTH: Round = 3;
pub const DEFAULT_MONTHS: u32 = 12;
pub const DEFAULT_LOSS_BOUND: Money = 50.0;
pub const DEFAULT_SALARY_GROWTH_RATE: f64 = 0.05;

/// The capital floor that ends a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossThreshold {
    /// Capital strictly below the bound loses.
    Below(Money),
    /// Capital at or below zero loses.
    AtOrBelowZero,
}

impl LossThreshold {
    pub fn is_breached(&self, capital: Money) -> bool {
        match self {
            Self::Below(bound) => capital < *bound,
            Self::AtOrBelowZero => capital <= 0.0,
        }
    }
}

impl Default for LossThreshold {
    fn default() -> Self {
        Self::Below(DEFAULT_LOSS_BOUND)
    }
}

/// Per-game overrides chosen on the start screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartOptions {
    pub months: Option<u32>,
    pub hard_threshold: Option<Money>,
}

/// Everything the reducer needs to know about a game, frozen at start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub rounds_per_month: Round,
    pub months: u32,
    pub max_rounds: Option<Round>,
    pub loss_threshold: LossThreshold,
    pub salary_growth_rate: f64,
    pub starting_salary: Money,
    pub expenses: MonthlyExpenses,
    pub calendar: MonthCalendar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_rounds_per_month")]
    pub rounds_per_month: Round,
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default)]
    pub max_rounds: Option<Round>,
    #[serde(default)]
    pub loss_threshold: LossThreshold,
    #[serde(default = "default_salary_growth_rate")]
    pub salary_growth_rate: f64,
    /// Net monthly salary. Takes precedence over `monthly_ctc`.
    #[serde(default)]
    pub monthly_salary: Option<Money>,
    /// Gross monthly pay; converted to take-home with the region's taxes.
    #[serde(default)]
    pub monthly_ctc: Option<Money>,
    pub expenses: MonthlyExpenses,
    #[serde(default = "default_start_month")]
    pub start_month: NaiveDate,
}

fn default_rounds_per_month() -> Round { DEFAULT_ROUNDS_PER_MONTH }
fn default_months() -> u32 { DEFAULT_MONTHS }
fn default_salary_growth_rate() -> f64 { DEFAULT_SALARY_GROWTH_RATE }

impl GameConfig {
    /// Load from a JSON file.
    /// In tests, use GameConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)?;
        log::debug!(
            "config loaded from {path}: {} months x {} rounds",
            config.months,
            config.rounds_per_month
        );
        Ok(config)
    }

    /// Load from the data/ directory.
    pub fn load_from_data_dir(data_dir: &str) -> anyhow::Result<Self> {
        Self::load(&format!("{data_dir}/config/game_config.json"))
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Salary 4000, expenses 1500 per month, 3 rounds a month, 12 months.
    pub fn default_test() -> Self {
        Self {
            rounds_per_month: DEFAULT_ROUNDS_PER_MONTH,
            months: DEFAULT_MONTHS,
            max_rounds: None,
            loss_threshold: LossThreshold::default(),
            salary_growth_rate: DEFAULT_SALARY_GROWTH_RATE,
            monthly_salary: Some(4_000.0),
            monthly_ctc: None,
            expenses: MonthlyExpenses::none(RegionCode::Tx)
                .with_rent(1_000.0)
                .with_groceries(300.0)
                .with_utilities(150.0)
                .with_internet_cable(50.0),
            start_month: default_start_month(),
        }
    }

    /// Resolve the frozen rules for one game.
    pub fn rules(&self, options: &StartOptions) -> GameResult<GameRules> {
        if self.rounds_per_month == 0 {
            return Err(GameError::invalid_input("rounds_per_month must be at least 1"));
        }
        let months = options.months.unwrap_or(self.months);
        if months == 0 {
            return Err(GameError::invalid_input("months must be at least 1"));
        }
        if self.max_rounds == Some(0) {
            return Err(GameError::invalid_input("max_rounds must be at least 1 when set"));
        }
        if !self.salary_growth_rate.is_finite() || self.salary_growth_rate <= -1.0 {
            return Err(GameError::invalid_input(format!(
                "salary_growth_rate {} is out of range",
                self.salary_growth_rate
            )));
        }

        let loss_threshold = match options.hard_threshold {
            Some(bound) if !bound.is_finite() => {
                return Err(GameError::invalid_input(format!("threshold {bound} is not finite")));
            }
            Some(bound) => LossThreshold::Below(bound),
            None => self.loss_threshold,
        };

        let starting_salary = match (self.monthly_salary, self.monthly_ctc) {
            (Some(salary), _) => salary,
            (None, Some(ctc)) => monthly_take_home(ctc, self.expenses.region)?,
            (None, None) => 0.0,
        };
        if !starting_salary.is_finite() || starting_salary < 0.0 {
            return Err(GameError::invalid_input(format!(
                "monthly salary must be a non-negative amount, got {starting_salary}"
            )));
        }

        self.expenses.validate()?;

        Ok(GameRules {
            rounds_per_month: self.rounds_per_month,
            months,
            max_rounds: self.max_rounds,
            loss_threshold,
            salary_growth_rate: self.salary_growth_rate,
            starting_salary,
            expenses: self.expenses.clone(),
            calendar: MonthCalendar::new(self.start_month),
        })
    }
}
