//! Finance-charge date backfill.
//!
//! Finance-charge lines carry no date of their own. Each real purchase fixes
//! the nearest pending charge before it; whatever is left after the
//! statement takes the last real date seen before it.

use crate::types::{EntryDate, StatementDay, StatementEntry};

/// Give `date` to the nearest pending finance charge, scanning backward.
/// Returns the index that was resolved.
pub fn backfill_latest(entries: &mut [StatementEntry], date: &StatementDay) -> Option<usize> {
    let idx = entries.iter().rposition(StatementEntry::is_pending_finance_charge)?;
    entries[idx].date = EntryDate::Resolved(date.clone());
    Some(idx)
}

/// Carry the most recent real date forward onto pending finance charges.
/// Charges with no real date before them stay pending.
pub fn backfill_forward(entries: &mut [StatementEntry]) {
    let mut last_real: Option<StatementDay> = None;
    for entry in entries.iter_mut() {
        match &entry.date {
            EntryDate::Resolved(day) => last_real = Some(day.clone()),
            EntryDate::Pending => {
                if let Some(day) = &last_real {
                    entry.date = EntryDate::Resolved(day.clone());
                }
            }
        }
    }
}
