//! tally-ingest: credit-card statement PDFs to transaction records.
//!
//! Pipeline per statement: page text ([`pdf`]), year context ([`year`]),
//! line classification ([`classifier`]), finance-charge backfill
//! ([`backfill`]), all driven by [`extract`].

pub mod backfill;
pub mod classifier;
pub mod extract;
pub mod locator;
pub mod pdf;
pub mod types;
pub mod year;

pub use classifier::{ClassifierRules, LineKind, classify_line};
pub use extract::{Extractor, StatementExtractor, YearFilter, default_year_filters};
pub use locator::find_statements;
pub use pdf::{ExtractError, PageSource, PdfPageSource, StatementText};
pub use types::{EntryDate, EntryKind, StatementDay, StatementEntry, TransactionRecord};
pub use year::{LabelYearResolver, StatementYear, YearResolver, resolve_year};
