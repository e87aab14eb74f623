//! Planning calculators: FIRE projection, tax estimate, emergency fund.
//!
//! These are standalone tools next to the game. The game only uses the
//! tax estimate, to derive a take-home salary during setup.

use crate::{
    error::{GameError, GameResult},
    expenses::RegionCode,
    types::Money,
};
use serde::{Deserialize, Serialize};

pub const STANDARD_DEDUCTION: Money = 13_850.0;
pub const FICA_RATE: f64 = 0.0765;
/// Projections longer than this are reported as unreachable.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// (lower, upper, rate). Lower bounds are inclusive whole dollars.
pub const FEDERAL_TAX_BRACKETS: [(Money, Money, f64); 7] = [
    (0.0, 11_000.0, 0.10),
    (11_001.0, 44_725.0, 0.12),
    (44_726.0, 95_375.0, 0.22),
    (95_376.0, 182_100.0, 0.24),
    (182_101.0, 231_250.0, 0.32),
    (231_251.0, 578_125.0, 0.35),
    (578_126.0, f64::INFINITY, 0.37),
];

// ── FIRE ─────────────────────────────────────────────────────────

pub fn fire_number(annual_expenses: Money, passive_income: Money, withdrawal_rate: f64) -> Money {
    (annual_expenses - passive_income) / withdrawal_rate
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireInputs {
    pub age: u32,
    pub region: RegionCode,
    pub base_expenses: Money,
    pub initial_savings: Money,
    pub annual_savings: Money,
    pub investment_return: f64,
    /// Year in which the property is sold into savings.
    pub property_maturity: u32,
    pub property_value: Money,
    pub rental_income: Money,
    pub withdrawal_rate: f64,
}

impl Default for FireInputs {
    fn default() -> Self {
        Self {
            age: 25,
            region: RegionCode::Ca,
            base_expenses: 40_000.0,
            initial_savings: 50_000.0,
            annual_savings: 20_000.0,
            investment_return: 0.07,
            property_maturity: 15,
            property_value: 200_000.0,
            rental_income: 5_000.0,
            withdrawal_rate: 0.04,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireProjection {
    pub fire_number: Money,
    pub years_needed: u32,
    pub retirement_age: u32,
}

/// Years of saving until the portfolio reaches the FIRE number.
/// Returns None when it takes more than `MAX_PROJECTION_YEARS`.
pub fn years_to_fire(inputs: &FireInputs) -> Option<FireProjection> {
    let region = inputs.region.profile();
    let adjusted_expenses = inputs.base_expenses * region.cost_of_living;
    let effective_savings = inputs.annual_savings * (1.0 - region.state_tax);
    let target = fire_number(adjusted_expenses, inputs.rental_income, inputs.withdrawal_rate);

    let mut savings = inputs.initial_savings;
    let mut years = 0u32;
    while savings < target {
        savings += effective_savings;
        savings *= 1.0 + inputs.investment_return;
        years += 1;
        if years == inputs.property_maturity {
            savings += inputs.property_value * (1.0 + region.property_growth).powi(years as i32);
        }
        if years > MAX_PROJECTION_YEARS {
            return None;
        }
    }

    Some(FireProjection {
        fire_number: target,
        years_needed: years,
        retirement_age: inputs.age + years,
    })
}

// ── Tax ──────────────────────────────────────────────────────────

pub fn federal_tax(income: Money) -> Money {
    let taxable = (income - STANDARD_DEDUCTION).max(0.0);
    let tax: Money = FEDERAL_TAX_BRACKETS
        .iter()
        .filter(|(lower, _, _)| taxable > *lower)
        .map(|(lower, upper, rate)| (taxable.min(*upper) - lower) * rate)
        .sum();
    (tax * 100.0).round() / 100.0
}

pub fn state_tax(income: Money, region: RegionCode) -> Money {
    income * region.profile().state_tax
}

pub fn fica(income: Money) -> Money {
    income * FICA_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal: Money,
    pub state: Money,
    pub fica: Money,
    pub total: Money,
    pub effective_rate: f64,
}

pub fn tax_breakdown(income: Money, region: RegionCode) -> TaxBreakdown {
    let federal = federal_tax(income);
    let state = state_tax(income, region);
    let fica = fica(income);
    let total = federal + state + fica;
    TaxBreakdown {
        federal,
        state,
        fica,
        total,
        effective_rate: if income > 0.0 { total / income } else { 0.0 },
    }
}

// ── Emergency fund ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFundStatus {
    pub months_covered: f64,
    pub needed_for_6: Money,
    pub needed_for_12: Money,
    /// Share of a 12-month fund already saved, capped at 1.0.
    pub progress: f64,
}

pub fn emergency_fund(monthly_expenses: Money, current_savings: Money) -> GameResult<EmergencyFundStatus> {
    if !monthly_expenses.is_finite() || monthly_expenses <= 0.0 {
        return Err(GameError::invalid_input(format!(
            "monthly expenses must be positive, got {monthly_expenses}"
        )));
    }
    Ok(EmergencyFundStatus {
        months_covered: current_savings / monthly_expenses,
        needed_for_6: monthly_expenses * 6.0,
        needed_for_12: monthly_expenses * 12.0,
        progress: (current_savings / (monthly_expenses * 12.0)).min(1.0),
    })
}
