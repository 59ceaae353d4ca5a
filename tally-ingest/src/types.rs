use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("valid day regex"));

/// Month/day as printed on a statement row, e.g. `03/17`.
///
/// Only the shape is checked on construction. Calendar validity depends on
/// the year and is decided by [`StatementDay::to_date`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementDay(String);

impl StatementDay {
    pub fn parse(token: &str) -> Option<Self> {
        if DAY_RE.is_match(token) {
            Some(Self(token.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn month(&self) -> u32 {
        self.0.get(..2).and_then(|m| m.parse().ok()).unwrap_or(0)
    }

    pub fn day(&self) -> u32 {
        self.0.get(3..).and_then(|d| d.parse().ok()).unwrap_or(0)
    }

    /// Combine with a year. `None` for days like `02/30` or `13/01`.
    pub fn to_date(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month(), self.day())
    }
}

impl fmt::Display for StatementDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date of a working entry. Finance charges start out `Pending` and pick up
/// the date of a neighbouring purchase during backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDate {
    Resolved(StatementDay),
    Pending,
}

impl EntryDate {
    pub fn resolved(&self) -> Option<&StatementDay> {
        match self {
            EntryDate::Resolved(day) => Some(day),
            EntryDate::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, EntryDate::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Purchase,
    FinanceCharge,
}

/// Per-statement working record, mutable until the statement is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementEntry {
    pub date: EntryDate,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub year: Option<i32>,
}

impl StatementEntry {
    pub fn purchase(date: StatementDay, name: String, amount: Decimal, year: Option<i32>) -> Self {
        Self {
            date: EntryDate::Resolved(date),
            name,
            amount,
            kind: EntryKind::Purchase,
            year,
        }
    }

    pub fn finance_charge(amount: Decimal) -> Self {
        Self {
            date: EntryDate::Pending,
            name: FINANCE_CHARGE_NAME.to_string(),
            amount,
            kind: EntryKind::FinanceCharge,
            year: None,
        }
    }

    pub fn is_pending_finance_charge(&self) -> bool {
        self.kind == EntryKind::FinanceCharge && self.date.is_pending()
    }
}

pub const FINANCE_CHARGE_NAME: &str = "PERIODIC FINANCE CHARGE";

/// Normalized output of statement extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: StatementDay,
    pub name: String,
    /// Positive means charge/spend; negative means credit/refund.
    pub amount: Decimal,
    /// Statement year this row belongs to, when one could be resolved.
    pub year: Option<i32>,
    /// File name of the statement the row came from.
    pub source: String,
}

impl TransactionRecord {
    /// Key used for cross-statement duplicate suppression.
    pub fn dedup_key(&self) -> (&str, &str, Decimal) {
        (self.date.as_str(), &self.name, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_day_shape() {
        assert!(StatementDay::parse("03/17").is_some());
        assert!(StatementDay::parse("3/17").is_none());
        assert!(StatementDay::parse("03/17/24").is_none());
        assert!(StatementDay::parse("AB/CD").is_none());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(StatementDay::parse("०३/१२").is_none());
        assert!(StatementDay::parse("０３/１２").is_none());
    }

    #[test]
    fn test_statement_day_to_date() {
        let day = StatementDay::parse("02/29").unwrap();
        assert_eq!(day.month(), 2);
        assert_eq!(day.day(), 29);
        assert_eq!(day.to_date(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(day.to_date(2023), None);
        assert_eq!(StatementDay::parse("13/01").unwrap().to_date(2024), None);
    }

    #[test]
    fn test_finance_charge_starts_pending() {
        let entry = StatementEntry::finance_charge(Decimal::new(1500, 2));
        assert!(entry.is_pending_finance_charge());
        assert_eq!(entry.name, FINANCE_CHARGE_NAME);
        assert_eq!(entry.date.resolved(), None);
    }
}
