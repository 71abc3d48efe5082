use serde::{Deserialize, Serialize};

use super::domain::OptionalAmount;
use super::inputs::PropertyInputs;

/// Every derived underwriting figure for one input snapshot.
///
/// A transient view: recompute it after any input mutation. It is never
/// stored and none of its fields is independently mutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub total_units: u32,
    pub total_rent: f64,
    pub monthly_income: f64,
    pub yearly_income: f64,
    pub total_gsi: f64,
    pub vacancy_loss: f64,
    pub total_expenses: f64,
    pub op_expense_amount: f64,
    pub expense_ratio: f64,
    pub net_operating_income: f64,
    pub cap_rate_asking_price: OptionalAmount,
    pub cap_rate_offer_price: OptionalAmount,
    pub cap_rate_offer_rehab: OptionalAmount,
    pub offer_plus_rehab: OptionalAmount,
    pub asking_plus_rehab: OptionalAmount,
    pub price_per_unit_offer: OptionalAmount,
    pub price_per_unit_offer_rehab: OptionalAmount,
}

impl FinancialSnapshot {
    /// Derive the full snapshot from the inputs.
    ///
    /// Pure and re-entrant; dependency order runs unit totals, scheduled
    /// income, vacancy, expenses, NOI, then the price-dependent ratios.
    /// Zero denominators never propagate: ratios with a zero divisor read
    /// as zero (expense ratio) or stay unset (cap rates, per-unit prices).
    pub fn derive(inputs: &PropertyInputs) -> Self {
        let rows = inputs.units.rows();
        let total_units: u32 = rows.iter().map(|row| row.count()).sum();
        // Row totals are recomputed from count * rent; the cached value on
        // each row is display state, not an input.
        let total_rent: f64 = rows
            .iter()
            .map(|row| f64::from(row.count()) * row.rent())
            .sum();

        let monthly_income = total_rent;
        let yearly_income = monthly_income * 12.0;
        let total_gsi = yearly_income + inputs.other_income;

        let vacancy_loss = total_gsi * inputs.vacancy_rate / 100.0;

        let total_expenses = inputs.expenses.total();
        let op_expense_amount = total_gsi * inputs.op_expense_rate / 100.0;
        let expense_ratio = if total_gsi == 0.0 {
            0.0
        } else {
            total_expenses * 100.0 / total_gsi
        };

        // A nonzero operating-expense rate overrides the itemized ledger:
        // the proforma figure wins, the two are never blended.
        let operating_expenses = if inputs.op_expense_rate != 0.0 {
            op_expense_amount
        } else {
            total_expenses
        };
        let net_operating_income = total_gsi - vacancy_loss - operating_expenses;

        let offer = inputs.offer_price.nonzero();
        let asking = inputs.asking_price.nonzero();
        let rehab = inputs.rehab_cost.nonzero();
        let offer_plus_rehab = match (offer, rehab) {
            (Some(offer), Some(rehab)) => OptionalAmount::set(offer + rehab),
            _ => OptionalAmount::unset(),
        };
        let asking_plus_rehab = match (asking, rehab) {
            (Some(asking), Some(rehab)) => OptionalAmount::set(asking + rehab),
            _ => OptionalAmount::unset(),
        };

        let cap_rate_asking_price = cap_rate(net_operating_income, asking);
        let cap_rate_offer_price = cap_rate(net_operating_income, offer);
        let cap_rate_offer_rehab = cap_rate(net_operating_income, offer_plus_rehab.nonzero());

        let price_per_unit_offer = per_unit(offer, total_units);
        let price_per_unit_offer_rehab = per_unit(offer_plus_rehab.nonzero(), total_units);

        Self {
            total_units,
            total_rent,
            monthly_income,
            yearly_income,
            total_gsi,
            vacancy_loss,
            total_expenses,
            op_expense_amount,
            expense_ratio,
            net_operating_income,
            cap_rate_asking_price,
            cap_rate_offer_price,
            cap_rate_offer_rehab,
            offer_plus_rehab,
            asking_plus_rehab,
            price_per_unit_offer,
            price_per_unit_offer_rehab,
        }
    }
}

/// NOI over a price, as a percentage. Requires a present, nonzero price and
/// a nonzero NOI: a zero-income building has no cap rate, it shows the
/// placeholder instead of 0.00%.
fn cap_rate(net_operating_income: f64, price: Option<f64>) -> OptionalAmount {
    match price {
        Some(price) if net_operating_income != 0.0 => {
            OptionalAmount::set(net_operating_income * 100.0 / price)
        }
        _ => OptionalAmount::unset(),
    }
}

fn per_unit(price: Option<f64>, total_units: u32) -> OptionalAmount {
    match price {
        Some(price) if total_units > 0 => OptionalAmount::set(price / f64::from(total_units)),
        _ => OptionalAmount::unset(),
    }
}
