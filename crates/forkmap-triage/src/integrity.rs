//! Full board integrity scan.
//!
//! Extends the structural scan in [`forkmap_core::graph::integrity`] with
//! timeline violations: items that conflict with the bucket they already
//! sit in.

use forkmap_core::graph::integrity::{self, IntegrityIssue, IntegrityReport};
use forkmap_core::{Board, EngineConfig};
use tracing::{debug, instrument};

use crate::conflict::analyze_current;

/// One [`IntegrityIssue::TimelineViolation`] per item with conflicts against
/// its own bucket, in declaration order.
#[must_use]
pub fn timeline_violations(board: &Board, config: &EngineConfig) -> Vec<IntegrityIssue> {
    board
        .items()
        .iter()
        .filter_map(|item| {
            let report = analyze_current(board, config, &item.id);
            report.has_conflicts.then(|| IntegrityIssue::TimelineViolation {
                item_id: item.id.clone(),
                conflicts: report.len(),
                message: format!("{} has {} scheduling conflicts", item.name, report.len()),
            })
        })
        .collect()
}

/// Dangling dependencies, committed cycles, then timeline violations.
#[must_use]
#[instrument(skip(board, config))]
pub fn scan(board: &Board, config: &EngineConfig) -> IntegrityReport {
    let mut report = integrity::scan(board);
    report.extend(timeline_violations(board, config));
    debug!(valid = report.is_valid, issues = report.issues.len(), "integrity scan");
    report
}
