//! Per-statement extraction: drive the classifier over a statement's lines
//! and turn the result into finished records.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::backfill::{backfill_forward, backfill_latest};
use crate::classifier::{ClassifierRules, LineKind, classify_line};
use crate::pdf::{PageSource, StatementText};
use crate::types::{EntryDate, StatementEntry, TransactionRecord};
use crate::year::{StatementYear, YearResolver};

/// Statements whose file name contains `filename_contains` only keep
/// purchases from `year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearFilter {
    pub filename_contains: String,
    pub year: i32,
}

pub fn default_year_filters() -> Vec<YearFilter> {
    vec![YearFilter {
        filename_contains: "2025".to_string(),
        year: 2024,
    }]
}

pub fn filter_year_for(filters: &[YearFilter], filename: &str) -> Option<i32> {
    filters
        .iter()
        .find(|f| filename.contains(&f.filename_contains))
        .map(|f| f.year)
}

/// Line-at-a-time state machine for one statement.
#[derive(Debug)]
pub struct StatementExtractor<'a> {
    rules: &'a ClassifierRules,
    year: StatementYear,
    filter_year: Option<i32>,
    active: bool,
    entries: Vec<StatementEntry>,
}

impl<'a> StatementExtractor<'a> {
    pub fn new(rules: &'a ClassifierRules, year: StatementYear, filter_year: Option<i32>) -> Self {
        Self {
            rules,
            year,
            filter_year,
            active: false,
            entries: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn feed(&mut self, line: &str) {
        match classify_line(line, self.active, self.rules) {
            LineKind::SectionStart => self.active = true,
            LineKind::SectionEnd => self.active = false,
            LineKind::FinanceCharge(amount) => {
                self.entries.push(StatementEntry::finance_charge(amount));
            }
            LineKind::Transaction { date, name, amount } => {
                let year = self.year.year_for(&date);
                if let Some(want) = self.filter_year {
                    if year != Some(want) {
                        trace!(line, ?year, want, "outside statement year filter");
                        return;
                    }
                }
                self.entries.push(StatementEntry::purchase(date.clone(), name, amount, year));
                backfill_latest(&mut self.entries, &date);
            }
            LineKind::Skip => trace!(line, "skipped"),
        }
    }

    /// Run the forward backfill and emit records. Finance charges that never
    /// received a date are dropped.
    pub fn finish(mut self, source: &str) -> Vec<TransactionRecord> {
        backfill_forward(&mut self.entries);

        let year = self.year;
        self.entries
            .into_iter()
            .filter_map(|entry| match entry.date {
                EntryDate::Resolved(date) => Some(TransactionRecord {
                    year: entry.year.or_else(|| year.year_for(&date)),
                    date,
                    name: entry.name,
                    amount: entry.amount,
                    source: source.to_string(),
                }),
                EntryDate::Pending => {
                    warn!(source, amount = %entry.amount, "finance charge with no dated transaction, dropped");
                    None
                }
            })
            .collect()
    }
}

/// Extracts records from statement files.
pub struct Extractor<S, R> {
    source: S,
    resolver: R,
    rules: ClassifierRules,
    year_filters: Vec<YearFilter>,
}

impl<S: PageSource, R: YearResolver> Extractor<S, R> {
    pub fn new(source: S, resolver: R) -> Self {
        Self {
            source,
            resolver,
            rules: ClassifierRules::default(),
            year_filters: default_year_filters(),
        }
    }

    pub fn with_rules(mut self, rules: ClassifierRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_year_filters(mut self, filters: Vec<YearFilter>) -> Self {
        self.year_filters = filters;
        self
    }

    pub fn extract_file(&self, path: &Path) -> Result<Vec<TransactionRecord>> {
        let text = self
            .source
            .pages(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.extract_text(&text, &filename))
    }

    pub fn extract_text(&self, text: &StatementText, filename: &str) -> Vec<TransactionRecord> {
        let year = self.resolver.statement_year(text.first_page(), filename);
        let filter_year = filter_year_for(&self.year_filters, filename);
        debug!(filename, ?year, ?filter_year, pages = text.pages.len(), "extracting statement");

        let mut extractor = StatementExtractor::new(&self.rules, year, filter_year);
        for line in text.lines() {
            extractor.feed(line);
        }
        extractor.finish(filename)
    }
}
