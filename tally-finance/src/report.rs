//! Summary figures and CSV output.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::aggregate::ExpenseRow;

pub const DEFAULT_OUTPUT_FILE: &str = "extracted_expenses.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total: Decimal,
}

impl Summary {
    pub fn of(rows: &[ExpenseRow]) -> Self {
        Self {
            count: rows.len(),
            total: rows.iter().map(|r| r.amount).sum(),
        }
    }
}

/// `$1,234.50`, `-$12.00`.
pub fn format_currency(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// Write rows with a `Date,Name,Amount` header.
pub fn write_csv(path: impl AsRef<Path>, rows: &[ExpenseRow]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        wtr.serialize(row).with_context(|| format!("writing {}", path.display()))?;
    }
    wtr.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(date: &str, name: &str, amount: &str) -> ExpenseRow {
        ExpenseRow {
            date: date.to_string(),
            name: name.to_string(),
            amount: dec(amount),
        }
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(format_currency(dec("4.5")), "$4.50");
        assert_eq!(format_currency(dec("1234.5")), "$1,234.50");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(dec("-12")), "-$12.00");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_summary_sums_signed_amounts() {
        let rows = vec![row("03/12", "A", "4.50"), row("03/13", "REFUND", "-1.25"), row("03/14", "B", "45.20")];
        let summary = Summary::of(&rows);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, dec("48.45"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_FILE);
        let rows = vec![row("03/12", "COFFEE SHOP", "4.50"), row("03/16", "SHOP, INC", "-2.00")];

        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines, vec!["Date,Name,Amount", "03/12,COFFEE SHOP,4.50", "03/16,\"SHOP, INC\",-2.00"]);
    }
}
