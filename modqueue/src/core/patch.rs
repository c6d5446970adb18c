//! Positional replacement of one report inside a loaded collection.

use serde::Serialize;

use crate::core::normalize::ReportView;

/// Result of applying a resolved report to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// The element with the matching id was replaced at `index`.
    Replaced { index: usize },
    /// The collection was not in `Success`; nothing to patch.
    SliceNotLoaded,
    /// No element carries the updated report's id.
    NotFound,
}

/// Replace the view whose report id matches `updated`, keeping its index.
///
/// Every other element and the collection's order are left as they were.
/// Returns `NotFound` without touching the collection when no id matches.
pub fn replace_by_id<V: ReportView>(reports: &mut [V], updated: V) -> PatchOutcome {
    let id = updated.report_id();
    match reports.iter().position(|report| report.report_id() == id) {
        Some(index) => {
            reports[index] = updated;
            PatchOutcome::Replaced { index }
        }
        None => PatchOutcome::NotFound,
    }
}
