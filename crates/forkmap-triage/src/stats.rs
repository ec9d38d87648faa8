//! Whole-board dependency statistics.

use forkmap_core::{Board, EngineConfig};
use serde::Serialize;
use tracing::instrument;

use crate::conflict::{ConflictKind, analyze_current};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyStats {
    pub total_items: usize,
    /// Direct dependency entries across all items.
    pub total_dependencies: usize,
    pub max_dependencies: usize,
    pub average_dependencies: f64,
    /// Items in conflict with the bucket they sit in.
    pub items_with_conflicts: usize,
    /// Of those, items whose report includes a dependency cycle.
    pub circular_dependencies: usize,
}

#[must_use]
#[instrument(skip(board, config))]
#[allow(clippy::cast_precision_loss)]
pub fn dependency_stats(board: &Board, config: &EngineConfig) -> DependencyStats {
    let items = board.items();
    let mut stats = DependencyStats {
        total_items: items.len(),
        total_dependencies: 0,
        max_dependencies: 0,
        average_dependencies: 0.0,
        items_with_conflicts: 0,
        circular_dependencies: 0,
    };

    for item in items {
        stats.total_dependencies += item.dependencies.len();
        stats.max_dependencies = stats.max_dependencies.max(item.dependencies.len());

        let report = analyze_current(board, config, &item.id);
        if report.has_conflicts {
            stats.items_with_conflicts += 1;
            if report.contains(ConflictKind::CircularDependency) {
                stats.circular_dependencies += 1;
            }
        }
    }

    if stats.total_items > 0 {
        stats.average_dependencies = stats.total_dependencies as f64 / stats.total_items as f64;
    }
    stats
}
