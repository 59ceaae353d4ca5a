//! Merge records from all statements into one deduplicated, date-ordered table.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_ingest::TransactionRecord;
use tracing::debug;

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
}

impl From<TransactionRecord> for ExpenseRow {
    fn from(r: TransactionRecord) -> Self {
        Self {
            date: r.date.to_string(),
            name: r.name,
            amount: r.amount,
        }
    }
}

/// Keep the first record of every (date, name, amount), preserving order.
pub fn dedup(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let (date, name, amount) = r.dedup_key();
            seen.insert((date.to_string(), name.to_string(), amount))
        })
        .collect()
}

/// Calendar date used for ordering. `None` when month/day/year is not a
/// real date.
pub fn sort_key(record: &TransactionRecord, fallback_year: i32) -> Option<NaiveDate> {
    record.date.to_date(record.year.unwrap_or(fallback_year))
}

/// Stable ascending sort; records without a valid date go last, in their
/// original order.
pub fn sort_chronological(records: &mut [TransactionRecord], fallback_year: i32) {
    records.sort_by_key(|r| {
        let key = sort_key(r, fallback_year);
        (key.is_none(), key)
    });
}

/// Statement batches, in discovery order, to the final table.
pub fn aggregate<I>(batches: I, fallback_year: i32) -> Vec<ExpenseRow>
where
    I: IntoIterator<Item = Vec<TransactionRecord>>,
{
    let merged: Vec<TransactionRecord> = batches.into_iter().flatten().collect();
    let total = merged.len();

    let mut unique = dedup(merged);
    debug!(total, unique = unique.len(), "deduplicated records");

    sort_chronological(&mut unique, fallback_year);
    unique.into_iter().map(ExpenseRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tally_ingest::StatementDay;

    fn rec(date: &str, name: &str, amount: &str, year: Option<i32>, source: &str) -> TransactionRecord {
        TransactionRecord {
            date: StatementDay::parse(date).unwrap(),
            name: name.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            year,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_dedup_across_sources_keeps_first() {
        let records = vec![
            rec("03/12", "COFFEE SHOP", "4.50", Some(2024), "a.pdf"),
            rec("03/12", "COFFEE SHOP", "4.50", Some(2024), "b.pdf"),
            rec("03/12", "Coffee Shop", "4.50", Some(2024), "b.pdf"),
            rec("03/12", "COFFEE SHOP", "4.5", Some(2024), "b.pdf"),
        ];
        let unique = dedup(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source, "a.pdf");
        assert_eq!(unique[1].name, "Coffee Shop");
    }

    #[test]
    fn test_sorts_across_years() {
        let mut records = vec![
            rec("03/15", "C", "1.00", Some(2024), "s.pdf"),
            rec("01/02", "B", "1.00", Some(2024), "s.pdf"),
            rec("12/31", "A", "1.00", Some(2023), "s.pdf"),
        ];
        sort_chronological(&mut records, 2026);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_invalid_dates_sort_last_and_stable() {
        let mut records = vec![
            rec("02/30", "BAD1", "1.00", Some(2024), "s.pdf"),
            rec("05/01", "LATE", "1.00", Some(2024), "s.pdf"),
            rec("13/01", "BAD2", "1.00", Some(2024), "s.pdf"),
            rec("01/01", "EARLY", "1.00", Some(2024), "s.pdf"),
        ];
        sort_chronological(&mut records, 2026);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["EARLY", "LATE", "BAD1", "BAD2"]);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let mut records = vec![
            rec("04/04", "SECOND", "2.00", Some(2024), "b.pdf"),
            rec("04/04", "FIRST", "1.00", Some(2024), "a.pdf"),
        ];
        sort_chronological(&mut records, 2026);
        assert_eq!(records[0].name, "SECOND");
    }

    #[test]
    fn test_unresolved_year_uses_fallback() {
        let r = rec("02/29", "LEAP", "1.00", None, "s.pdf");
        assert_eq!(sort_key(&r, 2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(sort_key(&r, 2025), None);
    }

    #[test]
    fn test_aggregate_drops_helpers() {
        let batches = vec![
            vec![rec("03/16", "GROCERY STORE", "45.20", Some(2024), "a.pdf")],
            vec![
                rec("03/12", "COFFEE SHOP", "4.50", Some(2024), "b.pdf"),
                rec("03/16", "GROCERY STORE", "45.20", Some(2024), "b.pdf"),
            ],
        ];
        let rows = aggregate(batches, 2026);
        assert_eq!(
            rows,
            vec![
                ExpenseRow {
                    date: "03/12".into(),
                    name: "COFFEE SHOP".into(),
                    amount: Decimal::from_str("4.50").unwrap(),
                },
                ExpenseRow {
                    date: "03/16".into(),
                    name: "GROCERY STORE".into(),
                    amount: Decimal::from_str("45.20").unwrap(),
                },
            ]
        );
    }
}
