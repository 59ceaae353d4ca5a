//! Run extraction over many statements, isolating per-file failures.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tally_ingest::{Extractor, PageSource, TransactionRecord, YearResolver};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct StatementOutcome {
    pub file: String,
    pub result: Result<Vec<TransactionRecord>, String>,
}

impl StatementOutcome {
    pub fn count(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Extract every statement in order. A failing file contributes no records
/// and does not stop the batch.
pub fn extract_all<S, R>(extractor: &Extractor<S, R>, paths: &[PathBuf]) -> Vec<StatementOutcome>
where
    S: PageSource,
    R: YearResolver,
{
    paths
        .iter()
        .map(|path| {
            let file = display_name(path);
            // PDF backends can panic on hostile input; keep that to this file.
            let result = match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract_file(path))) {
                Ok(extracted) => extracted.map_err(|e| format!("{e:#}")),
                Err(payload) => Err(format!("extraction panicked: {}", panic_message(payload.as_ref()))),
            };
            match &result {
                Ok(records) => debug!(file = %file, count = records.len(), "statement extracted"),
                Err(message) => warn!(file = %file, error = %message, "statement failed"),
            }
            StatementOutcome { file, result }
        })
        .collect()
}

/// Successful batches in discovery order.
pub fn successful(outcomes: Vec<StatementOutcome>) -> impl Iterator<Item = Vec<TransactionRecord>> {
    outcomes.into_iter().filter_map(|o| o.result.ok())
}
