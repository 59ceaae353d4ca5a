//! tally-finance: cross-statement aggregation and reporting

pub mod aggregate;
pub mod batch;
pub mod report;

pub use aggregate::{ExpenseRow, aggregate, dedup, sort_chronological, sort_key};
pub use batch::{StatementOutcome, extract_all, successful};
pub use report::{DEFAULT_OUTPUT_FILE, Summary, format_currency, write_csv};
