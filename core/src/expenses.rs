//! Monthly expenses, region data and take-home salary.
//!
//! Expenses are edited during setup only. Once a game starts they are
//! frozen into `GameRules` and deducted as one total at every month end.

use crate::{
    error::{GameError, GameResult},
    planning,
    types::Money,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionCode {
    #[serde(rename = "CA")]
    Ca,
    #[serde(rename = "NY")]
    Ny,
    #[serde(rename = "TX")]
    Tx,
    #[serde(rename = "FL")]
    Fl,
}

pub const ALL_REGIONS: [RegionCode; 4] =
    [RegionCode::Ca, RegionCode::Ny, RegionCode::Tx, RegionCode::Fl];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionProfile {
    pub name: &'static str,
    pub cost_of_living: f64,
    pub state_tax: f64,
    pub property_growth: f64,
    pub rental_yield: f64,
}

impl RegionCode {
    pub fn profile(&self) -> RegionProfile {
        match self {
            Self::Ca => RegionProfile {
                name: "California",
                cost_of_living: 1.5,
                state_tax: 0.09,
                property_growth: 0.05,
                rental_yield: 0.04,
            },
            Self::Ny => RegionProfile {
                name: "New York",
                cost_of_living: 1.7,
                state_tax: 0.065,
                property_growth: 0.06,
                rental_yield: 0.035,
            },
            Self::Tx => RegionProfile {
                name: "Texas",
                cost_of_living: 1.1,
                state_tax: 0.0,
                property_growth: 0.04,
                rental_yield: 0.05,
            },
            Self::Fl => RegionProfile {
                name: "Florida",
                cost_of_living: 1.2,
                state_tax: 0.0,
                property_growth: 0.045,
                rental_yield: 0.05,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSubscription {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loans {
    #[serde(default)]
    pub car_loan: Money,
    #[serde(default)]
    pub student_loan: Money,
    #[serde(default)]
    pub home_loan: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpenses {
    pub region: RegionCode,
    #[serde(default)]
    pub health_insurance: Money,
    #[serde(default)]
    pub utilities: Money,
    #[serde(default)]
    pub groceries: Money,
    #[serde(default)]
    pub rent: Money,
    #[serde(default)]
    pub internet_cable: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gym_fitness: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_services: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_subscription: Option<CustomSubscription>,
    #[serde(default)]
    pub loans: Loans,
}

impl MonthlyExpenses {
    /// No expenses at all in the given region.
    pub fn none(region: RegionCode) -> Self {
        Self {
            region,
            health_insurance: 0.0,
            utilities: 0.0,
            groceries: 0.0,
            rent: 0.0,
            internet_cable: 0.0,
            gym_fitness: None,
            streaming_services: None,
            custom_subscription: None,
            loans: Loans::default(),
        }
    }

    pub fn with_rent(mut self, rent: Money) -> Self {
        self.rent = rent;
        self
    }

    pub fn with_groceries(mut self, groceries: Money) -> Self {
        self.groceries = groceries;
        self
    }

    pub fn with_utilities(mut self, utilities: Money) -> Self {
        self.utilities = utilities;
        self
    }

    pub fn with_health_insurance(mut self, amount: Money) -> Self {
        self.health_insurance = amount;
        self
    }

    pub fn with_internet_cable(mut self, amount: Money) -> Self {
        self.internet_cable = amount;
        self
    }

    pub fn with_gym_fitness(mut self, amount: Money) -> Self {
        self.gym_fitness = Some(amount);
        self
    }

    pub fn with_streaming_services(mut self, amount: Money) -> Self {
        self.streaming_services = Some(amount);
        self
    }

    pub fn with_custom_subscription(mut self, name: impl Into<String>, amount: Money) -> Self {
        self.custom_subscription = Some(CustomSubscription { name: name.into(), amount });
        self
    }

    pub fn with_loans(mut self, loans: Loans) -> Self {
        self.loans = loans;
        self
    }

    /// Every amount, labelled. Optional entries appear only when set.
    pub fn line_items(&self) -> Vec<(&str, Money)> {
        let mut items = vec![
            ("health_insurance", self.health_insurance),
            ("utilities", self.utilities),
            ("groceries", self.groceries),
            ("rent", self.rent),
            ("internet_cable", self.internet_cable),
        ];
        if let Some(gym) = self.gym_fitness {
            items.push(("gym_fitness", gym));
        }
        if let Some(streaming) = self.streaming_services {
            items.push(("streaming_services", streaming));
        }
        if let Some(sub) = &self.custom_subscription {
            items.push((sub.name.as_str(), sub.amount));
        }
        items.push(("car_loan", self.loans.car_loan));
        items.push(("student_loan", self.loans.student_loan));
        items.push(("home_loan", self.loans.home_loan));
        items
    }

    pub fn total(&self) -> Money {
        self.line_items().iter().map(|(_, amount)| amount).sum()
    }

    pub fn validate(&self) -> GameResult<()> {
        for (label, amount) in self.line_items() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(GameError::invalid_input(format!(
                    "expense '{label}' must be a non-negative amount, got {amount}"
                )));
            }
        }
        Ok(())
    }
}

/// Net monthly salary from a monthly cost-to-company, after federal,
/// state and FICA tax on the annualized figure.
pub fn monthly_take_home(monthly_ctc: Money, region: RegionCode) -> GameResult<Money> {
    if !monthly_ctc.is_finite() || monthly_ctc < 0.0 {
        return Err(GameError::invalid_input(format!(
            "monthly CTC must be a non-negative amount, got {monthly_ctc}"
        )));
    }
    let annual = monthly_ctc * 12.0;
    let taxes = planning::tax_breakdown(annual, region);
    Ok((annual - taxes.total) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_items_count_only_when_set() {
        let base = MonthlyExpenses::none(RegionCode::Tx).with_rent(1200.0);
        assert_eq!(base.total(), 1200.0);
        let full = base
            .with_gym_fitness(40.0)
            .with_custom_subscription("music", 10.0)
            .with_loans(Loans { car_loan: 300.0, student_loan: 0.0, home_loan: 0.0 });
        assert_eq!(full.total(), 1550.0);
    }

    #[test]
    fn negative_expense_is_rejected() {
        let bad = MonthlyExpenses::none(RegionCode::Ca).with_groceries(-5.0);
        assert!(matches!(bad.validate(), Err(GameError::InvalidInput { .. })));
    }
}
