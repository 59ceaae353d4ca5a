use tally_finance::{ExpenseRow, StatementOutcome, Summary, format_currency};

pub fn print_outcomes(outcomes: &[StatementOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(records) => println!("Processed {}: {} transactions", outcome.file, records.len()),
            Err(message) => println!("Error processing {}: {}", outcome.file, message),
        }
    }
}

pub fn print_table(rows: &[ExpenseRow]) {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    println!("{:<5}  {:<name_width$}  {:>10}", "Date", "Name", "Amount");
    for row in rows {
        println!("{:<5}  {:<name_width$}  {:>10}", row.date, row.name, row.amount.to_string());
    }
}

pub fn print_summary(summary: &Summary) {
    println!("Total unique transactions: {}", summary.count);
    println!("Total amount: {}", format_currency(summary.total));
}
