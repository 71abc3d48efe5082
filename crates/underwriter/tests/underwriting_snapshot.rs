use underwriter::workflows::analysis::AnalysisRequest;
use underwriter::workflows::underwriting::{
    ExpenseCategory, FinancialSnapshot, OptionalAmount, PropertyInputs,
};

fn ten_unit_building() -> PropertyInputs {
    let mut inputs = PropertyInputs::default();
    inputs.identity.property_address = "2847 Maplewood Ave, Des Moines, IA".to_string();
    inputs.units.set_count(0, 10).expect("row 0 exists");
    inputs.units.set_rent(0, 1000.0).expect("row 0 exists");
    inputs.vacancy_rate = 5.0;
    inputs.op_expense_rate = 40.0;
    inputs.asking_price = OptionalAmount::set(1000000.0);
    inputs
}

#[test]
fn unit_rows_total_independently() {
    let mut inputs = PropertyInputs::default();
    inputs.units.set_count(0, 4).expect("row");
    inputs.units.set_rent(0, 900.0).expect("row");
    inputs.units.set_count(3, 6).expect("row");
    inputs.units.set_rent(3, 1100.0).expect("row");

    let before = inputs.units.rows()[3].ttl_month_rent();
    inputs.units.set_count(0, 8).expect("row");
    assert_eq!(inputs.units.rows()[3].ttl_month_rent(), before);

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.total_units, 14);
    assert_eq!(snapshot.total_rent, 8.0 * 900.0 + 6.0 * 1100.0);
}

#[test]
fn yearly_income_is_exactly_twelve_months() {
    let mut inputs = PropertyInputs::default();
    inputs.units.set_count(1, 7).expect("row");
    inputs.units.set_rent(1, 1234.0).expect("row");

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.yearly_income, snapshot.monthly_income * 12.0);
    assert_eq!(snapshot.yearly_income, 103656.0);
}

#[test]
fn zero_gsi_keeps_expense_ratio_at_zero() {
    let mut inputs = PropertyInputs::default();
    inputs.expenses.set(ExpenseCategory::Taxes, 15000.0);

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.total_gsi, 0.0);
    assert_eq!(snapshot.expense_ratio, 0.0);
    assert!(snapshot.expense_ratio.is_finite());
}

#[test]
fn unset_asking_price_leaves_cap_rate_unset() {
    let mut inputs = ten_unit_building();
    inputs.asking_price = OptionalAmount::unset();

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert!(!snapshot.cap_rate_asking_price.is_set());
    assert!(snapshot.net_operating_income > 0.0);
}

#[test]
fn vacancy_loss_is_exact_at_ten_percent() {
    let mut inputs = PropertyInputs::default();
    inputs.units.set_count(0, 10).expect("row");
    inputs.units.set_rent(0, 800.0).expect("row");
    inputs.other_income = 4000.0;
    inputs.vacancy_rate = 10.0;

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.total_gsi, 100000.0);
    assert_eq!(snapshot.vacancy_loss, 10000.0);
}

#[test]
fn nonzero_rate_overrides_the_itemized_ledger() {
    let mut inputs = ten_unit_building();
    inputs.expenses.set(ExpenseCategory::Taxes, 20000.0);
    inputs.expenses.set(ExpenseCategory::Insurance, 7000.0);

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.total_expenses, 27000.0);
    assert_eq!(snapshot.op_expense_amount, 48000.0);
    // NOI uses the rate-derived figure even though the ledger disagrees.
    assert_eq!(snapshot.net_operating_income, 120000.0 - 6000.0 - 48000.0);
}

#[test]
fn all_zero_rows_leave_every_cap_rate_unset() {
    let mut inputs = PropertyInputs::default();
    inputs.asking_price = OptionalAmount::set(2000000.0);
    inputs.offer_price = OptionalAmount::set(1800000.0);
    inputs.rehab_cost = OptionalAmount::set(100000.0);

    let snapshot = FinancialSnapshot::derive(&inputs);
    assert_eq!(snapshot.total_units, 0);
    assert_eq!(snapshot.total_rent, 0.0);
    assert_eq!(snapshot.monthly_income, 0.0);
    assert!(!snapshot.cap_rate_asking_price.is_set());
    assert!(!snapshot.cap_rate_offer_price.is_set());
    assert!(!snapshot.cap_rate_offer_rehab.is_set());
}

#[test]
fn ten_unit_scenario_derives_the_published_figures() {
    let snapshot = FinancialSnapshot::derive(&ten_unit_building());
    assert_eq!(snapshot.monthly_income, 10000.0);
    assert_eq!(snapshot.yearly_income, 120000.0);
    assert_eq!(snapshot.total_gsi, 120000.0);
    assert_eq!(snapshot.vacancy_loss, 6000.0);
    assert_eq!(snapshot.op_expense_amount, 48000.0);
    assert_eq!(snapshot.net_operating_income, 66000.0);
    assert_eq!(snapshot.cap_rate_asking_price.get(), Some(6.6));
}

#[test]
fn offer_and_rehab_feed_the_combined_cap_rate() {
    let mut inputs = ten_unit_building();
    inputs.offer_price = OptionalAmount::set(900000.0);

    let offer_only = FinancialSnapshot::derive(&inputs);
    assert!(offer_only.cap_rate_offer_price.is_set());
    assert!(!offer_only.cap_rate_offer_rehab.is_set());

    inputs.rehab_cost = OptionalAmount::set(200000.0);
    let with_rehab = FinancialSnapshot::derive(&inputs);
    assert_eq!(with_rehab.offer_plus_rehab.get(), Some(1100000.0));
    assert_eq!(with_rehab.cap_rate_offer_rehab.get(), Some(6.0));
}

#[test]
fn derivation_is_idempotent() {
    let inputs = ten_unit_building();
    let first = FinancialSnapshot::derive(&inputs);
    let second = FinancialSnapshot::derive(&inputs);
    assert_eq!(first, second);
}

#[test]
fn snapshot_survives_the_analysis_request_round_trip() {
    let mut inputs = ten_unit_building();
    inputs.expenses.set(ExpenseCategory::Management, 9600.0);
    let snapshot = FinancialSnapshot::derive(&inputs);

    let request = AnalysisRequest::assemble(&inputs, &snapshot);
    let encoded = serde_json::to_string(&request).expect("request encodes");
    let decoded: AnalysisRequest = serde_json::from_str(&encoded).expect("request decodes");

    assert_eq!(decoded, request);
    assert_eq!(decoded.net_operating_income, snapshot.net_operating_income);
    assert_eq!(decoded.cap_rate_asking_price, snapshot.cap_rate_asking_price);
    assert!(!decoded.cap_rate_offer_price.is_set());
}
