// 📤 Export - CSV and JSON renderings of the expense list
//
// Shared by the HTTP download endpoints and the `expense-ledger export`
// command, so both produce byte-identical files.

use crate::expense::Expense;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

pub const CSV_HEADER: [&str; 5] = ["ID", "Name", "Category", "Amount", "Date"];

/// Date layout used in CSV rows
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write expenses as CSV.
///
/// Fields are written raw, never quoted. Commas in the name become `;`;
/// other fields are written as stored.
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;

    for expense in expenses {
        let name = expense.name.replace(',', ";");
        let amount = format!("{:.2}", expense.amount);
        let date = expense.date.format(CSV_DATE_FORMAT).to_string();

        wtr.write_record([
            expense.id.as_str(),
            name.as_str(),
            expense.category.as_str(),
            amount.as_str(),
            date.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv(expenses: &[Expense]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(expenses, &mut buf)?;
    Ok(buf)
}

/// Serialize expenses as a JSON array indented with four spaces
pub fn to_json(expenses: &[Expense]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    expenses.serialize(&mut ser)?;
    Ok(buf)
}
