//! Statement-year inference.
//!
//! Rows only print `MM/DD`, so the year comes from the statement's header
//! block: a "Statement Date" or a billing/statement period. Early-year
//! statements also cover the previous December, which belongs to the prior
//! year.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::StatementDay;

pub const DEFAULT_PRIOR_DECEMBER_PATTERN: &str = r"(?i)jan(uary)?";

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)statement\s+date|billing\s+(?:cycle|period)|statement\s+period")
        .expect("valid label regex")
});

static DATES_AFTER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let date = concat!(
        r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}",
        r"|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+[0-9]{1,2},?\s+[0-9]{4}"
    );
    Regex::new(&format!(
        r"(?i)^\s*:?\s*(?:from\s+)?(?P<first>{date})(?:\s*(?:-|–|to|through)\s*(?P<last>{date}))?"
    ))
    .expect("valid date regex")
});

static DEFAULT_PRIOR_DECEMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PRIOR_DECEMBER_PATTERN).expect("valid default pattern"));

/// Year context for one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementYear {
    pub year: Option<i32>,
    /// December rows belong to `year - 1`.
    pub prior_december: bool,
}

impl StatementYear {
    pub fn year_for(&self, day: &StatementDay) -> Option<i32> {
        let year = self.year?;
        if self.prior_december && day.month() == 12 {
            Some(year - 1)
        } else {
            Some(year)
        }
    }
}

/// Supplies the year context of a statement. Formats with a different
/// header layout implement their own.
pub trait YearResolver {
    fn statement_year(&self, statement_text: &str, filename: &str) -> StatementYear;
}

/// Resolver for the label-based header used by the supported statements.
#[derive(Debug, Clone)]
pub struct LabelYearResolver {
    prior_december: Regex,
}

impl LabelYearResolver {
    pub fn new(prior_december_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            prior_december: Regex::new(prior_december_pattern)?,
        })
    }
}

impl Default for LabelYearResolver {
    fn default() -> Self {
        Self {
            prior_december: (*DEFAULT_PRIOR_DECEMBER_RE).clone(),
        }
    }
}

impl YearResolver for LabelYearResolver {
    fn statement_year(&self, statement_text: &str, filename: &str) -> StatementYear {
        StatementYear {
            year: find_statement_year(statement_text),
            prior_december: self.prior_december.is_match(filename),
        }
    }
}

/// Year of a single row date, using the default resolver.
pub fn resolve_year(statement_text: &str, filename: &str, transaction_date: &StatementDay) -> Option<i32> {
    LabelYearResolver::default()
        .statement_year(statement_text, filename)
        .year_for(transaction_date)
}

/// Year of the first labelled date in `text`. For a period, the closing
/// date decides.
pub fn find_statement_year(text: &str) -> Option<i32> {
    LABEL_RE.find_iter(text).find_map(|label| {
        let caps = DATES_AFTER_LABEL_RE.captures(&text[label.end()..])?;
        let date = caps.name("last").or_else(|| caps.name("first"))?;
        year_of(date.as_str())
    })
}

fn year_of(date: &str) -> Option<i32> {
    let digits: String = date
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let year: i32 = digits.parse().ok()?;
    Some(if year < 100 { year + 2000 } else { year })
}
