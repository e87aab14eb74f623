use wealthquest_core::{
    error::GameError,
    expenses::{monthly_take_home, RegionCode, ALL_REGIONS},
    planning::{self, FireInputs},
};

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn federal_tax_applies_the_standard_deduction() {
    assert_eq!(planning::federal_tax(10_000.0), 0.0);
    assert_eq!(planning::federal_tax(13_850.0), 0.0);
    // Taxable 36,150: 11,000 at 10% plus 25,149 at 12%.
    assert_close(planning::federal_tax(50_000.0), 4_117.88, 1e-6);
}

#[test]
fn federal_tax_is_monotonic() {
    let mut previous = 0.0;
    for income in (0..=700_000).step_by(5_000) {
        let tax = planning::federal_tax(income as f64);
        assert!(tax >= previous, "tax dropped at {income}");
        previous = tax;
    }
}

#[test]
fn state_and_fica_are_flat() {
    assert_close(planning::state_tax(50_000.0, RegionCode::Ca), 4_500.0, 1e-6);
    assert_close(planning::state_tax(50_000.0, RegionCode::Ny), 3_250.0, 1e-6);
    assert_eq!(planning::state_tax(50_000.0, RegionCode::Tx), 0.0);
    assert_eq!(planning::state_tax(50_000.0, RegionCode::Fl), 0.0);
    assert_close(planning::fica(50_000.0), 3_825.0, 1e-6);
}

#[test]
fn breakdown_totals_its_parts() {
    for region in ALL_REGIONS {
        let b = planning::tax_breakdown(80_000.0, region);
        assert_close(b.total, b.federal + b.state + b.fica, 1e-9);
        assert_close(b.effective_rate, b.total / 80_000.0, 1e-12);
    }
    assert_eq!(planning::tax_breakdown(0.0, RegionCode::Tx).effective_rate, 0.0);
}

#[test]
fn take_home_from_monthly_ctc() {
    // 60,000 a year in Texas: 5,460.16 federal, 4,590 FICA.
    assert_close(monthly_take_home(5_000.0, RegionCode::Tx).unwrap(), 4_162.486_666, 1e-4);
    assert!(monthly_take_home(5_000.0, RegionCode::Ca).unwrap() < 4_162.0);
    assert!(matches!(
        monthly_take_home(-1.0, RegionCode::Tx),
        Err(GameError::InvalidInput { .. })
    ));
}

#[test]
fn fire_number_divides_net_expenses_by_withdrawal_rate() {
    assert_close(planning::fire_number(60_000.0, 5_000.0, 0.04), 1_375_000.0, 1e-6);
    assert_close(planning::fire_number(40_000.0, 0.0, 0.05), 800_000.0, 1e-6);
}

#[test]
fn default_projection() {
    let projection = planning::years_to_fire(&FireInputs::default()).unwrap();
    // California: 40,000 * 1.5 living cost, less 5,000 rent, at 4%.
    assert_close(projection.fire_number, 1_375_000.0, 1e-6);
    assert_eq!(projection.years_needed, 19);
    assert_eq!(projection.retirement_age, 44);
}

#[test]
fn cheaper_region_retires_no_later() {
    let ca = planning::years_to_fire(&FireInputs::default()).unwrap();
    let tx = planning::years_to_fire(&FireInputs { region: RegionCode::Tx, ..FireInputs::default() })
        .unwrap();
    assert!(tx.years_needed <= ca.years_needed);
    assert!(tx.fire_number < ca.fire_number);
}

#[test]
fn already_there_needs_zero_years() {
    let inputs = FireInputs { initial_savings: 2_000_000.0, ..FireInputs::default() };
    let projection = planning::years_to_fire(&inputs).unwrap();
    assert_eq!(projection.years_needed, 0);
    assert_eq!(projection.retirement_age, inputs.age);
}

#[test]
fn unreachable_target_reports_none() {
    let inputs = FireInputs {
        initial_savings: 0.0,
        annual_savings: 0.0,
        investment_return: 0.0,
        property_value: 0.0,
        ..FireInputs::default()
    };
    assert!(planning::years_to_fire(&inputs).is_none());
}

#[test]
fn emergency_fund_coverage() {
    let status = planning::emergency_fund(3_500.0, 5_000.0).unwrap();
    assert_close(status.months_covered, 5_000.0 / 3_500.0, 1e-12);
    assert_eq!(status.needed_for_6, 21_000.0);
    assert_eq!(status.needed_for_12, 42_000.0);
    assert_close(status.progress, 5_000.0 / 42_000.0, 1e-12);

    let full = planning::emergency_fund(1_000.0, 50_000.0).unwrap();
    assert_eq!(full.progress, 1.0);

    assert!(matches!(
        planning::emergency_fund(0.0, 100.0),
        Err(GameError::InvalidInput { .. })
    ));
}
