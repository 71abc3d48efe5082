use std::io::Write;

use super::engine::FinancialSnapshot;
use super::inputs::PropertyInputs;

/// Write the underwriting sheet (unit mix, income analysis, expense ledger)
/// as CSV. Unset metrics render as the "-" placeholder, matching the form.
pub fn write_snapshot_csv<W: Write>(
    inputs: &PropertyInputs,
    snapshot: &FinancialSnapshot,
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record([
        "No of Units",
        "Beds",
        "Baths",
        "Curr Rent/mo",
        "TTL Month Rent",
    ])?;
    for row in inputs.units.rows() {
        csv.write_record([
            row.count().to_string(),
            row.beds.to_string(),
            format!("{}", row.baths),
            format!("{:.0}", row.rent()),
            format!("{:.0}", row.ttl_month_rent()),
        ])?;
    }
    csv.write_record([
        "Total Units".to_string(),
        snapshot.total_units.to_string(),
        String::new(),
        "Total Rent".to_string(),
        format!("{:.0}", snapshot.total_rent),
    ])?;

    csv.write_record([""])?;
    csv.write_record(["Metric", "Value"])?;
    for (label, value) in [
        ("Total Monthly Income ($/mo)", format!("{:.0}", snapshot.monthly_income)),
        ("Total Gross Yearly Income (GYI)", format!("{:.0}", snapshot.yearly_income)),
        ("Other Income", format!("{:.0}", inputs.other_income)),
        ("Total Gross Scheduled Income (GSI)", format!("{:.0}", snapshot.total_gsi)),
        ("Vacancy %", format!("{:.2}", inputs.vacancy_rate)),
        ("Vacancy Loss", format!("{:.0}", snapshot.vacancy_loss)),
        ("Op Expense %", format!("{:.2}", inputs.op_expense_rate)),
        ("Op Expense Amount", format!("{:.0}", snapshot.op_expense_amount)),
        ("Net Operating Income", format!("{:.0}", snapshot.net_operating_income)),
        ("Cap Rate Asking Price", snapshot.cap_rate_asking_price.format_or_dash(2)),
        ("Cap Rate Offer Price", snapshot.cap_rate_offer_price.format_or_dash(2)),
        ("Cap Rate on Offer + Rehab", snapshot.cap_rate_offer_rehab.format_or_dash(2)),
        ("Offer + Rehab", snapshot.offer_plus_rehab.format_or_dash(0)),
        ("Asking + Rehab", snapshot.asking_plus_rehab.format_or_dash(0)),
        ("$/Unit Offer", snapshot.price_per_unit_offer.format_or_dash(0)),
        ("$/Unit Offer + Rehab", snapshot.price_per_unit_offer_rehab.format_or_dash(0)),
    ] {
        csv.write_record([label.to_string(), value])?;
    }

    csv.write_record([""])?;
    csv.write_record(["Expense", "Annual Amount"])?;
    for category in super::domain::ExpenseCategory::ordered() {
        csv.write_record([
            category.label().to_string(),
            format!("{:.0}", inputs.expenses.amount(category)),
        ])?;
    }
    csv.write_record([
        "Total operating Expenses".to_string(),
        format!("{:.0}", snapshot.total_expenses),
    ])?;
    csv.write_record([
        "Total Expenses / GSI".to_string(),
        format!("{:.2}%", snapshot.expense_ratio),
    ])?;

    csv.flush()?;
    Ok(())
}
