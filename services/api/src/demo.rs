use std::fs::File;
use std::path::PathBuf;

use clap::Args;
use underwriter::error::AppError;
use underwriter::workflows::underwriting::{
    export, ExpenseCategory, FinancialSnapshot, OptionalAmount, PropertyInputs,
};

#[derive(Args, Debug)]
pub(crate) struct SnapshotArgs {
    /// Property input file (JSON, camelCase fields; numbers may be quoted)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also write the underwriting sheet as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Include the full unit-mix table in the output
    #[arg(long)]
    pub(crate) list_units: bool,
}

pub(crate) fn run_snapshot(args: SnapshotArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let inputs: PropertyInputs = serde_json::from_str(&raw).map_err(AppError::InputFile)?;
    let snapshot = FinancialSnapshot::derive(&inputs);

    render_snapshot(&inputs, &snapshot, args.list_units);

    if let Some(path) = args.csv {
        let file = File::create(&path)?;
        export::write_snapshot_csv(&inputs, &snapshot, file)?;
        println!("\nUnderwriting sheet written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let inputs = sample_property();
    let snapshot = FinancialSnapshot::derive(&inputs);
    render_snapshot(&inputs, &snapshot, true);
    Ok(())
}

/// A plausible ten-unit class B building for stakeholder demos.
fn sample_property() -> PropertyInputs {
    let mut inputs = PropertyInputs::default();
    inputs.identity.property_address = "2847 Maplewood Ave, Des Moines, IA".to_string();
    inputs.identity.prop_class = "B".to_string();
    inputs.identity.owner_contact = "R. Alvarez".to_string();
    inputs.identity.contact_phone = "515-555-0164".to_string();

    inputs.units.set_count(0, 4).expect("seeded row");
    inputs.units.set_rent(0, 850.0).expect("seeded row");
    inputs.units.set_count(1, 4).expect("seeded row");
    inputs.units.set_rent(1, 1050.0).expect("seeded row");
    inputs.units.set_count(6, 2).expect("seeded row");
    inputs.units.set_rent(6, 1400.0).expect("seeded row");

    inputs.other_income = 3600.0;
    inputs.vacancy_rate = 5.0;
    inputs.asking_price = OptionalAmount::set(1250000.0);
    inputs.offer_price = OptionalAmount::set(1150000.0);
    inputs.rehab_cost = OptionalAmount::set(80000.0);

    inputs.expenses.set(ExpenseCategory::Taxes, 21000.0);
    inputs.expenses.set(ExpenseCategory::Insurance, 9500.0);
    inputs.expenses.set(ExpenseCategory::WaterSewer, 6200.0);
    inputs.expenses.set(ExpenseCategory::Management, 11000.0);
    inputs.expenses.set(ExpenseCategory::Repairs, 8500.0);

    inputs
}

fn render_snapshot(inputs: &PropertyInputs, snapshot: &FinancialSnapshot, list_units: bool) {
    println!("Apartment underwriting snapshot");
    println!("Evaluated {}", chrono::Local::now().date_naive());
    if !inputs.identity.property_address.is_empty() {
        println!("Property: {}", inputs.identity.property_address);
    }
    if !inputs.identity.prop_class.is_empty() {
        println!("Class: {}", inputs.identity.prop_class);
    }

    println!("\nIncome analysis");
    println!("- Total units: {}", snapshot.total_units);
    println!("- Total monthly income: ${:.0}", snapshot.monthly_income);
    println!("- Gross yearly income: ${:.0}", snapshot.yearly_income);
    println!("- Other income: ${:.0}", inputs.other_income);
    println!("- Gross scheduled income: ${:.0}", snapshot.total_gsi);
    println!(
        "- Vacancy loss ({}%): ${:.0}",
        inputs.vacancy_rate, snapshot.vacancy_loss
    );

    println!("\nExpenses");
    println!("- Itemized total: ${:.0}", snapshot.total_expenses);
    println!(
        "- Rate-derived ({}% of GSI): ${:.0}",
        inputs.op_expense_rate, snapshot.op_expense_amount
    );
    println!("- Expense ratio: {:.2}%", snapshot.expense_ratio);

    println!("\nReturns");
    println!("- Net operating income: ${:.0}", snapshot.net_operating_income);
    println!(
        "- Cap rate on asking: {}%",
        snapshot.cap_rate_asking_price.format_or_dash(2)
    );
    println!(
        "- Cap rate on offer: {}%",
        snapshot.cap_rate_offer_price.format_or_dash(2)
    );
    println!(
        "- Cap rate on offer + rehab: {}%",
        snapshot.cap_rate_offer_rehab.format_or_dash(2)
    );
    println!(
        "- $/unit at offer: {}",
        snapshot.price_per_unit_offer.format_or_dash(0)
    );
    println!(
        "- $/unit at offer + rehab: {}",
        snapshot.price_per_unit_offer_rehab.format_or_dash(0)
    );

    if list_units {
        println!("\nUnit mix");
        for row in inputs.units.rows() {
            println!(
                "- {} bed / {} bath | {} units @ ${:.0}/mo = ${:.0}",
                row.beds,
                row.baths,
                row.count(),
                row.rent(),
                row.ttl_month_rent()
            );
        }
    }
}
