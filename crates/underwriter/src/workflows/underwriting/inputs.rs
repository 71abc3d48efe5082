use serde::{Deserialize, Serialize};

use super::coercion;
use super::domain::{ExpenseLedger, OptionalAmount, UnitMix};

/// Raw identifying fields for the property under analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyIdentity {
    pub property_address: String,
    pub prop_class: String,
    pub owner_contact: String,
    pub contact_phone: String,
}

/// One existing lien on the property. Pass-through data for the analysis
/// request; nothing downstream derives from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MortgageTerms {
    pub amount: OptionalAmount,
    pub rate: OptionalAmount,
    pub payment: OptionalAmount,
    pub assumable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MortgageSchedule {
    pub first: MortgageTerms,
    pub second: MortgageTerms,
}

/// The full input snapshot the derivation engine reads.
///
/// Every numeric field applies the lenient coercion policy on the way in, so
/// the engine itself never sees an unparseable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyInputs {
    #[serde(flatten)]
    pub identity: PropertyIdentity,
    pub offer_price: OptionalAmount,
    pub asking_price: OptionalAmount,
    pub rehab_cost: OptionalAmount,
    pub down_payment: OptionalAmount,
    pub closing_costs: OptionalAmount,
    #[serde(deserialize_with = "coercion::lenient_count")]
    pub subsidized_units: u32,
    pub all_bills_paid: bool,
    #[serde(deserialize_with = "coercion::lenient_amount")]
    pub other_income: f64,
    #[serde(deserialize_with = "coercion::lenient_amount")]
    pub vacancy_rate: f64,
    #[serde(deserialize_with = "coercion::lenient_amount")]
    pub op_expense_rate: f64,
    pub units: UnitMix,
    pub expenses: ExpenseLedger,
    pub mortgages: MortgageSchedule,
}

impl Default for PropertyInputs {
    fn default() -> Self {
        Self {
            identity: PropertyIdentity::default(),
            offer_price: OptionalAmount::unset(),
            asking_price: OptionalAmount::unset(),
            rehab_cost: OptionalAmount::unset(),
            down_payment: OptionalAmount::unset(),
            closing_costs: OptionalAmount::unset(),
            subsidized_units: 0,
            all_bills_paid: false,
            other_income: 0.0,
            vacancy_rate: 0.0,
            op_expense_rate: 0.0,
            units: UnitMix::standard(),
            expenses: ExpenseLedger::new(),
            mortgages: MortgageSchedule::default(),
        }
    }
}

impl PropertyInputs {
    pub fn new(identity: PropertyIdentity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_seeds_the_standard_form() {
        let inputs: PropertyInputs = serde_json::from_str("{}").expect("parses");
        assert_eq!(inputs.units.rows().len(), 8);
        assert!(!inputs.offer_price.is_set());
        assert_eq!(inputs.vacancy_rate, 0.0);
    }

    #[test]
    fn price_fields_keep_unset_distinct_from_zero() {
        let inputs: PropertyInputs = serde_json::from_str(
            r#"{"askingPrice": "", "offerPrice": 0, "rehabCost": "45000"}"#,
        )
        .expect("parses");
        assert!(!inputs.asking_price.is_set());
        assert!(inputs.offer_price.is_set());
        assert!(inputs.offer_price.nonzero().is_none());
        assert_eq!(inputs.rehab_cost.get(), Some(45000.0));
    }

    #[test]
    fn textual_rates_coerce_to_zero() {
        let inputs: PropertyInputs =
            serde_json::from_str(r#"{"vacancyRate": "n/a", "opExpenseRate": "40"}"#)
                .expect("parses");
        assert_eq!(inputs.vacancy_rate, 0.0);
        assert_eq!(inputs.op_expense_rate, 40.0);
    }
}
