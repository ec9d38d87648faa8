//! Per-move conflict checks.
//!
//! Every check reads through an [`Overlay`] in which the moved item already
//! sits in the target bucket. The board itself is never written, so the
//! item's committed bucket is the same before and after analysis on every
//! path.

use forkmap_core::graph::{BoardView, Overlay, direct_dependents, items_in_bucket, items_in_bucket_and_layer};
use forkmap_core::{Board, EngineConfig, Item};
use tracing::{debug, instrument};

use super::cycles::find_cycle_from;
use super::{Conflict, ConflictKind, ConflictReport};

/// Analyze moving `item_id` into `target_bucket`.
///
/// An unknown item yields an empty report. An unknown target bucket has no
/// order index, so the ordering checks report nothing; the cycle and
/// capacity checks still run.
#[must_use]
#[instrument(skip(board, config))]
pub fn analyze(
    board: &Board,
    config: &EngineConfig,
    item_id: &str,
    target_bucket: &str,
) -> ConflictReport {
    let Some(item) = board.item(item_id) else {
        debug!("unknown item, nothing to analyze");
        return ConflictReport::empty();
    };

    let view = Overlay::new(board, item_id, target_bucket);
    let mut conflicts = Vec::new();

    if let Some(target_index) = board.bucket_index(target_bucket) {
        conflicts.extend(dependency_after(&view, item, target_index));
        conflicts.extend(dependent_before(&view, item, target_index));
    }
    conflicts.extend(circular_dependency(&view, item));
    conflicts.extend(headliner_limit(&view, config, item, target_bucket));
    conflicts.extend(bucket_overload(board, config, target_bucket));

    let report = ConflictReport::from_conflicts(conflicts);
    debug!(
        conflicts = report.len(),
        severity = %report.severity,
        auto_resolvable = report.auto_resolvable,
        "move analyzed"
    );
    report
}

/// Analyze an item against the bucket it currently sits in.
///
/// This is how standing scheduling violations are found: a board with no
/// problems yields an empty report for every item.
#[must_use]
pub fn analyze_current(board: &Board, config: &EngineConfig, item_id: &str) -> ConflictReport {
    board.item(item_id).map_or_else(ConflictReport::empty, |item| {
        analyze(board, config, item_id, &item.bucket)
    })
}

/// Direct dependencies scheduled strictly after the target bucket.
fn dependency_after(view: &Overlay<'_>, item: &Item, target_index: usize) -> Vec<Conflict> {
    item.dependencies
        .iter()
        .filter_map(|dep_id| view.item(dep_id))
        .filter(|dep| {
            view.bucket_index_of(&dep.id)
                .is_some_and(|index| index > target_index)
        })
        .map(|dep| {
            Conflict::new(
                ConflictKind::DependencyAfter,
                format!("{} (dependency) is scheduled after target fork", dep.name),
            )
            .with_item(&dep.id, &dep.name)
            .in_bucket(&dep.bucket)
        })
        .collect()
}

/// Direct dependents scheduled strictly before the target bucket.
fn dependent_before(view: &Overlay<'_>, item: &Item, target_index: usize) -> Vec<Conflict> {
    direct_dependents(view, &item.id)
        .into_iter()
        .filter(|dependent| {
            view.bucket_index_of(&dependent.id)
                .is_some_and(|index| index < target_index)
        })
        .map(|dependent| {
            Conflict::new(
                ConflictKind::DependentBefore,
                format!("{} (dependent) is scheduled before target fork", dependent.name),
            )
            .with_item(&dependent.id, &dependent.name)
            .in_bucket(&dependent.bucket)
        })
        .collect()
}

fn circular_dependency(view: &Overlay<'_>, item: &Item) -> Option<Conflict> {
    let cycle = find_cycle_from(view, &item.id)?;

    let names: Vec<&str> = cycle
        .iter()
        .map(|id| view.item(id).map_or(id.as_str(), |member| member.name.as_str()))
        .collect();

    let mut conflict = Conflict::new(
        ConflictKind::CircularDependency,
        format!(
            "Moving this item would create a circular dependency: {}",
            names.join(" → ")
        ),
    )
    .with_item(&item.id, &item.name)
    .in_bucket(&item.bucket);
    conflict.cycle = cycle;
    Some(conflict)
}

/// A headliner entering a bucket whose same-layer headliners, not counting
/// the item itself, already fill the cap.
fn headliner_limit(
    view: &Overlay<'_>,
    config: &EngineConfig,
    item: &Item,
    target_bucket: &str,
) -> Option<Conflict> {
    if !item.is_headliner() {
        return None;
    }

    let present = items_in_bucket_and_layer(view, target_bucket, &item.layer)
        .into_iter()
        .filter(|other| other.id != item.id && other.is_headliner())
        .count();
    let cap = config.conflicts.headliner_cap_for(target_bucket, &item.layer);
    if present < cap {
        return None;
    }

    Some(
        Conflict::new(
            ConflictKind::HeadlinerLimit,
            format!(
                "Fork {target_bucket} already has maximum {} headliners",
                item.layer
            ),
        )
        .in_bucket(target_bucket),
    )
}

/// Target bucket's committed complexity weight over the configured
/// threshold. The moved item counts only if it already sits there.
fn bucket_overload(board: &Board, config: &EngineConfig, target_bucket: &str) -> Option<Conflict> {
    let total: u32 = items_in_bucket(board, target_bucket)
        .iter()
        .map(|item| item.complexity.weight())
        .sum();
    if total <= config.conflicts.overload_threshold {
        return None;
    }

    Some(
        Conflict::new(
            ConflictKind::BucketOverload,
            format!("Fork {target_bucket} is becoming overloaded (complexity: {total})"),
        )
        .in_bucket(target_bucket),
    )
}
