//! Turning a conflict list into a [`Plan`].

use forkmap_core::Board;
use tracing::{debug, instrument};

use crate::conflict::{Conflict, ConflictKind};

use super::{ManualAction, Plan, ProposedMove, ResolutionStrategy};

/// Outcome of one strategy applied to one conflict.
enum Proposal {
    Move(ProposedMove),
    Manual(ManualAction),
}

/// Plan fixes for `conflicts`, produced by analyzing `item_id` into
/// `target_bucket`.
///
/// Conflicts are handled in order. Kinds without a strategy, conflicts whose
/// offending item is not on the board, and an unknown target bucket all end
/// up in `manual` with the conflict's message.
#[must_use]
#[instrument(skip(board, conflicts), fields(conflicts = conflicts.len()))]
pub fn plan(board: &Board, item_id: &str, target_bucket: &str, conflicts: &[Conflict]) -> Plan {
    let mut plan = Plan::default();
    let target_index = board.bucket_index(target_bucket);

    for conflict in conflicts {
        let proposal = match (ResolutionStrategy::for_kind(conflict.kind), target_index) {
            (Some(strategy), Some(target_index)) => propose(board, strategy, conflict, target_index),
            _ => None,
        };

        match proposal {
            Some(Proposal::Move(proposed)) if proposed.automatic => plan.moves.push(proposed),
            Some(Proposal::Move(proposed)) => plan.warnings.push(proposed),
            Some(Proposal::Manual(action)) => plan.manual.push(action),
            None => plan.manual.push(ManualAction::from_conflict(conflict)),
        }
    }

    debug!(
        item = item_id,
        moves = plan.moves.len(),
        warnings = plan.warnings.len(),
        manual = plan.manual.len(),
        "resolution planned"
    );
    plan
}

fn propose(
    board: &Board,
    strategy: ResolutionStrategy,
    conflict: &Conflict,
    target_index: usize,
) -> Option<Proposal> {
    let later = target_index.saturating_add(1).min(board.last_bucket_index());

    match strategy {
        ResolutionStrategy::MoveDependencyEarlier => {
            let offending = board.item(conflict.item_id.as_deref()?)?;
            let bucket = board.bucket_at(target_index.saturating_sub(1))?;
            Some(Proposal::Move(ProposedMove {
                item_id: offending.id.clone(),
                item_name: offending.name.clone(),
                target_bucket: bucket.id.clone(),
                description: format!("Move {} to {}", offending.name, bucket.id),
                automatic: strategy.is_automatic(),
                strategy,
            }))
        }
        ResolutionStrategy::MoveDependentLater => {
            let offending = board.item(conflict.item_id.as_deref()?)?;
            let bucket = board.bucket_at(later)?;
            Some(Proposal::Move(ProposedMove {
                item_id: offending.id.clone(),
                item_name: offending.name.clone(),
                target_bucket: bucket.id.clone(),
                description: format!("Move {} to {}", offending.name, bucket.id),
                automatic: strategy.is_automatic(),
                strategy,
            }))
        }
        ResolutionStrategy::BreakCycle => {
            let bucket = board.bucket_at(later)?;
            let breakpoint = conflict
                .cycle
                .iter()
                .filter_map(|id| board.item(id))
                .find(|member| member.dependencies.len() == 1);

            Some(breakpoint.map_or_else(
                || {
                    Proposal::Manual(ManualAction {
                        kind: Some(ConflictKind::CircularDependency),
                        description: "Manual intervention required to resolve circular dependency"
                            .to_string(),
                    })
                },
                |member| {
                    Proposal::Move(ProposedMove {
                        item_id: member.id.clone(),
                        item_name: member.name.clone(),
                        target_bucket: bucket.id.clone(),
                        description: format!("Move {} to break circular dependency", member.name),
                        automatic: strategy.is_automatic(),
                        strategy,
                    })
                },
            ))
        }
    }
}
