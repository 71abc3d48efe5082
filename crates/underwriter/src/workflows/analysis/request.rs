use serde::{Deserialize, Serialize};

use crate::workflows::underwriting::{
    ExpenseLedger, FinancialSnapshot, MortgageSchedule, OptionalAmount, PropertyInputs, UnitMix,
};

/// The collaborator's request shape: identifying fields, raw inputs, and
/// every derived figure, flattened into one camelCase object.
///
/// Optional amounts serialize as number-or-null so a round trip through this
/// shape alters no numeric field and keeps "unset" distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub property_address: String,
    pub prop_class: String,
    pub owner_contact: String,
    pub contact_phone: String,
    pub offer_price: OptionalAmount,
    pub asking_price: OptionalAmount,
    pub rehab_cost: OptionalAmount,
    pub down_payment: OptionalAmount,
    pub closing_costs: OptionalAmount,
    pub num_units: u32,
    pub subsidized_units: u32,
    pub all_bills_paid: bool,
    pub total_rent: f64,
    pub monthly_income: f64,
    pub yearly_income: f64,
    pub other_income: f64,
    pub total_gsi: f64,
    pub vacancy_rate: f64,
    pub vacancy_loss: f64,
    pub op_expense_rate: f64,
    pub op_expense_amount: f64,
    pub total_expenses: f64,
    pub net_operating_income: f64,
    pub cap_rate_asking_price: OptionalAmount,
    pub cap_rate_offer_price: OptionalAmount,
    pub cap_rate_offer_rehab: OptionalAmount,
    pub expense_ratio: f64,
    pub units: UnitMix,
    pub expenses: ExpenseLedger,
    pub mortgages: MortgageSchedule,
}

impl AnalysisRequest {
    /// Pure assembly of the request from the input store and its derived
    /// snapshot. No I/O happens here; that is the collaborator's concern.
    pub fn assemble(inputs: &PropertyInputs, snapshot: &FinancialSnapshot) -> Self {
        Self {
            property_address: inputs.identity.property_address.clone(),
            prop_class: inputs.identity.prop_class.clone(),
            owner_contact: inputs.identity.owner_contact.clone(),
            contact_phone: inputs.identity.contact_phone.clone(),
            offer_price: inputs.offer_price,
            asking_price: inputs.asking_price,
            rehab_cost: inputs.rehab_cost,
            down_payment: inputs.down_payment,
            closing_costs: inputs.closing_costs,
            num_units: snapshot.total_units,
            subsidized_units: inputs.subsidized_units,
            all_bills_paid: inputs.all_bills_paid,
            total_rent: snapshot.total_rent,
            monthly_income: snapshot.monthly_income,
            yearly_income: snapshot.yearly_income,
            other_income: inputs.other_income,
            total_gsi: snapshot.total_gsi,
            vacancy_rate: inputs.vacancy_rate,
            vacancy_loss: snapshot.vacancy_loss,
            op_expense_rate: inputs.op_expense_rate,
            op_expense_amount: snapshot.op_expense_amount,
            total_expenses: snapshot.total_expenses,
            net_operating_income: snapshot.net_operating_income,
            cap_rate_asking_price: snapshot.cap_rate_asking_price,
            cap_rate_offer_price: snapshot.cap_rate_offer_price,
            cap_rate_offer_rehab: snapshot.cap_rate_offer_rehab,
            expense_ratio: snapshot.expense_ratio,
            units: inputs.units.clone(),
            expenses: inputs.expenses.clone(),
            mortgages: inputs.mortgages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::underwriting::OptionalAmount;

    #[test]
    fn assembly_copies_identity_and_derived_figures() {
        let mut inputs = PropertyInputs::default();
        inputs.identity.property_address = "415 Court Ave".to_string();
        inputs.units.set_count(0, 10).expect("row");
        inputs.units.set_rent(0, 1000.0).expect("row");
        inputs.asking_price = OptionalAmount::set(1000000.0);

        let snapshot = FinancialSnapshot::derive(&inputs);
        let request = AnalysisRequest::assemble(&inputs, &snapshot);

        assert_eq!(request.property_address, "415 Court Ave");
        assert_eq!(request.num_units, 10);
        assert_eq!(request.yearly_income, 120000.0);
        assert_eq!(request.cap_rate_asking_price, snapshot.cap_rate_asking_price);
    }
}
