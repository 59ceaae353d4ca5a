//! Line classifier for credit-card statement text.
//!
//! Expected text rows after PDF-to-text:
//!   Trans Post Reference Number Description                     Amount
//!   03/10 03/12 COFFEE SHOP                                       4.50
//!   PERIODIC*FINANCE CHARGE*PURCHASE                              2.00
//!   TOTAL PURCHASES                                              49.70

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::StatementDay;

static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page\s+[0-9]+\s+of\s+[0-9]+").expect("valid page regex"));

/// Markers that drive classification. Defaults match the supported
/// statement layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    pub section_start: String,
    pub section_end: String,
    pub payment_markers: Vec<String>,
    pub finance_marker: String,
    pub folio_markers: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            section_start: "Trans Post Reference".to_string(),
            section_end: "TOTAL PURCHASES".to_string(),
            payment_markers: vec![
                "PAYMENT THANK YOU".to_string(),
                "AUTOMATIC PAYMENT".to_string(),
            ],
            finance_marker: "PERIODIC*FINANCE".to_string(),
            folio_markers: vec!["CHECK-IN".to_string(), "FOLIO".to_string()],
        }
    }
}

impl ClassifierRules {
    pub fn with_payment_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_markers.extend(markers.into_iter().map(Into::into));
        self
    }
}

/// What a single statement line means.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Skip,
    SectionStart,
    SectionEnd,
    FinanceCharge(Decimal),
    Transaction {
        date: StatementDay,
        name: String,
        amount: Decimal,
    },
}

/// Classify one line. `active` is whether the transaction section has
/// started; the caller owns that state.
pub fn classify_line(line: &str, active: bool, rules: &ClassifierRules) -> LineKind {
    if !active && line.contains(&rules.section_start) {
        return LineKind::SectionStart;
    }

    if rules.payment_markers.iter().any(|m| line.contains(m.as_str())) {
        return LineKind::Skip;
    }

    if PAGE_RE.is_match(line) || line.to_lowercase().contains("account ending") {
        return LineKind::Skip;
    }

    if rules.folio_markers.iter().any(|m| line.contains(m.as_str()))
        || line.trim_start().starts_with('#')
    {
        return LineKind::Skip;
    }

    if line.contains(&rules.finance_marker) {
        return match line.split_whitespace().last().and_then(parse_amount) {
            Some(amount) => LineKind::FinanceCharge(amount),
            None => LineKind::Skip,
        };
    }

    if active && !line.trim().is_empty() {
        if let Some(kind) = parse_transaction(line) {
            return kind;
        }
    }

    if line.contains(&rules.section_end) {
        return LineKind::SectionEnd;
    }

    LineKind::Skip
}

fn parse_transaction(line: &str) -> Option<LineKind> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let first = StatementDay::parse(tokens[0])?;
    let last = tokens.len() - 1;

    // Trans date followed by post date: the post date is authoritative.
    let (date, name_tokens) = match StatementDay::parse(tokens[1]) {
        Some(post) => (post, &tokens[2..last]),
        None => (first, &tokens[1..last]),
    };

    let name = name_tokens.join(" ");
    if name.is_empty() {
        return None;
    }

    let amount = parse_amount(tokens[last])?;
    Some(LineKind::Transaction { date, name, amount })
}

/// Strip everything but digits, `.` and `-`.
pub fn clean_amount(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse an amount token; `None` if not numeric or zero.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(&clean_amount(token)).ok()?;
    if amount.is_zero() { None } else { Some(amount) }
}
